// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tollbooth caching core.

use thiserror::Error;

/// The primary error type used across all Tollbooth crates.
#[derive(Debug, Error)]
pub enum TollboothError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Cache key derivation failed because an argument has no canonical representation.
    ///
    /// Derivation never silently produces a non-deterministic key; an argument
    /// whose identity is not reproducible (e.g. a non-finite float) is rejected.
    #[error("key derivation error: {message}")]
    KeyDerivation { message: String },

    /// Backend invocation errors (API failure, quota exhaustion, malformed response).
    ///
    /// The router propagates these to the caller unchanged, leaving cache and
    /// cost state untouched.
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
