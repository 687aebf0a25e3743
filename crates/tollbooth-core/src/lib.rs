// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tollbooth caching and cost-accounting stack.
//!
//! This crate provides the foundational error type, shared types, and the
//! backend trait used throughout the Tollbooth workspace. Concrete backend
//! adapters live outside the core and implement [`Backend`].

pub mod backend;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use backend::Backend;
pub use error::TollboothError;
pub use types::{BackendRequest, BackendResponse, GenerationParams, Tier, UnitUsage};
