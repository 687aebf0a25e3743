// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tollbooth.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tollbooth configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
/// Immutable after startup from the core's perspective.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TollboothConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// The three pricing tiers.
    #[serde(default)]
    pub tiers: TierSettings,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "tollbooth".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    /// Default time-to-live for cached responses, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Maximum number of entries the cache may hold.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Interval between background expired-entry sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    1024
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

/// The three pricing tiers: cheap, medium, expensive.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierSettings {
    #[serde(default = "default_cheap_tier")]
    pub cheap: TierEntry,

    #[serde(default = "default_medium_tier")]
    pub medium: TierEntry,

    #[serde(default = "default_expensive_tier")]
    pub expensive: TierEntry,
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            cheap: default_cheap_tier(),
            medium: default_medium_tier(),
            expensive: default_expensive_tier(),
        }
    }
}

/// One tier definition: model identifier plus per-thousand-unit pricing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierEntry {
    /// Backend model identifier for this tier.
    pub model: String,

    /// USD per thousand input units.
    pub input_per_kunit: f64,

    /// USD per thousand output units.
    pub output_per_kunit: f64,
}

fn default_cheap_tier() -> TierEntry {
    TierEntry {
        model: "swift-mini".to_string(),
        input_per_kunit: 0.0005,
        output_per_kunit: 0.001,
    }
}

fn default_medium_tier() -> TierEntry {
    TierEntry {
        model: "swift-base".to_string(),
        input_per_kunit: 0.001,
        output_per_kunit: 0.002,
    }
}

fn default_expensive_tier() -> TierEntry {
    TierEntry {
        model: "swift-ultra".to_string(),
        input_per_kunit: 0.005,
        output_per_kunit: 0.01,
    }
}
