// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request coordination for the Tollbooth caching core.
//!
//! This crate provides [`Router`], which composes key derivation, the TTL
//! cache, and the cost tracker around a single backend invocation to
//! implement cache-or-compute-and-charge. Backend selection policy and the
//! concrete network call belong to the surrounding orchestration, not here.

pub mod router;

pub use router::{Dispatch, Router};
