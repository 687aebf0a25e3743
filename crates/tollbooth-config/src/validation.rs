// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive entry counts, finite non-negative prices,
//! and distinct tier model names.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{TierEntry, TollboothConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TollboothConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` is not one of: {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.cache.max_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.max_entries must be at least 1".to_string(),
        });
    }

    if config.cache.cleanup_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.cleanup_interval_secs must be at least 1".to_string(),
        });
    }

    for (name, tier) in [
        ("cheap", &config.tiers.cheap),
        ("medium", &config.tiers.medium),
        ("expensive", &config.tiers.expensive),
    ] {
        validate_tier(name, tier, &mut errors);
    }

    // Model names must be distinct so pricing-by-name lookups are unambiguous.
    let mut seen_models = HashSet::new();
    for tier in [
        &config.tiers.cheap,
        &config.tiers.medium,
        &config.tiers.expensive,
    ] {
        if !tier.model.trim().is_empty() && !seen_models.insert(&tier.model) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate model name `{}` across tiers", tier.model),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_tier(name: &str, tier: &TierEntry, errors: &mut Vec<ConfigError>) {
    if tier.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("tiers.{name}.model must not be empty"),
        });
    }

    for (field, price) in [
        ("input_per_kunit", tier.input_per_kunit),
        ("output_per_kunit", tier.output_per_kunit),
    ] {
        if !price.is_finite() {
            errors.push(ConfigError::Validation {
                message: format!("tiers.{name}.{field} must be finite, got {price}"),
            });
        } else if price < 0.0 {
            errors.push(ConfigError::Validation {
                message: format!("tiers.{name}.{field} must be non-negative, got {price}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = TollboothConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_max_entries_rejected() {
        let mut config = TollboothConfig::default();
        config.cache.max_entries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("max_entries")),
            "expected max_entries error"
        );
    }

    #[test]
    fn negative_price_rejected() {
        let mut config = TollboothConfig::default();
        config.tiers.medium.input_per_kunit = -0.001;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("tiers.medium.input_per_kunit")),
        );
    }

    #[test]
    fn non_finite_price_rejected() {
        let mut config = TollboothConfig::default();
        config.tiers.cheap.output_per_kunit = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("must be finite")),
        );
    }

    #[test]
    fn duplicate_model_names_rejected() {
        let mut config = TollboothConfig::default();
        config.tiers.expensive.model = config.tiers.cheap.model.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("duplicate model name")),
        );
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = TollboothConfig::default();
        config.service.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("log_level")));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = TollboothConfig::default();
        config.cache.max_entries = 0;
        config.tiers.cheap.model = String::new();
        config.service.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors, got {errors:?}");
    }
}
