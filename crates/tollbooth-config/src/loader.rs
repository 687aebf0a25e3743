// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tollbooth.toml` > `~/.config/tollbooth/tollbooth.toml`
//! > `/etc/tollbooth/tollbooth.toml` with environment variable overrides via
//! the `TOLLBOOTH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TollboothConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tollbooth/tollbooth.toml` (system-wide)
/// 3. `~/.config/tollbooth/tollbooth.toml` (user XDG config)
/// 4. `./tollbooth.toml` (local directory)
/// 5. `TOLLBOOTH_*` environment variables
pub fn load_config() -> Result<TollboothConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboothConfig::default()))
        .merge(Toml::file("/etc/tollbooth/tollbooth.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tollbooth/tollbooth.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tollbooth.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TollboothConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboothConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TollboothConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboothConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TOLLBOOTH_CACHE_MAX_ENTRIES`
/// must map to `cache.max_entries`, not `cache.max.entries`.
fn env_provider() -> Env {
    Env::prefixed("TOLLBOOTH_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TOLLBOOTH_TIERS_CHEAP_MODEL -> "tiers_cheap_model"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("cache_", "cache.", 1)
            .replacen("tiers_cheap_", "tiers.cheap.", 1)
            .replacen("tiers_medium_", "tiers.medium.", 1)
            .replacen("tiers_expensive_", "tiers.expensive.", 1);
        mapped.into()
    })
}
