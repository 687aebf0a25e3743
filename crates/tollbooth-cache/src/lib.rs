// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic cache key derivation and a bounded TTL cache.
//!
//! This crate provides:
//! - **Key derivation**: normalized, order-canonical argument hashing into
//!   fixed-length keys ([`derive_key`])
//! - **TTL cache**: a bounded store with lazy expiration and strict
//!   insertion-order eviction ([`TtlCache`])
//! - **Janitor**: a periodic background sweep for expired entries
//!   ([`spawn_cleanup`])

pub mod janitor;
pub mod key;
pub mod store;

pub use janitor::spawn_cleanup;
pub use key::{CacheKey, KeyPart, derive_key, normalize_text};
pub use store::TtlCache;
