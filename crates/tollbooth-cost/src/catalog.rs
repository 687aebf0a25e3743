// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The static three-tier pricing catalog.
//!
//! Exactly three named tiers (cheap, medium, expensive), each carrying a
//! model identifier and per-thousand-unit input/output prices. Loaded once
//! from configuration at startup and read-only thereafter.

use tollbooth_config::model::TierSettings;
use tollbooth_core::Tier;

/// Fallback input price (USD per thousand units) for unrecognized model
/// names. Matches the default medium tier.
pub const DEFAULT_INPUT_PER_KUNIT: f64 = 0.001;

/// Fallback output price (USD per thousand units) for unrecognized model
/// names.
pub const DEFAULT_OUTPUT_PER_KUNIT: f64 = 0.002;

/// Pricing for one tier: a model identifier plus per-thousand-unit prices.
#[derive(Debug, Clone, PartialEq)]
pub struct TierPricing {
    /// Backend model identifier for this tier.
    pub model: String,
    /// USD per thousand input units.
    pub input_per_kunit: f64,
    /// USD per thousand output units.
    pub output_per_kunit: f64,
    /// Which tier this pricing belongs to.
    pub tier: Tier,
}

/// The fixed registry of the three pricing tiers.
#[derive(Debug, Clone)]
pub struct TierCatalog {
    // Indexed by Tier::index().
    tiers: [TierPricing; 3],
}

impl TierCatalog {
    /// Build the catalog from startup configuration.
    pub fn from_config(settings: &TierSettings) -> Self {
        let entry = |tier: Tier| {
            let entry = match tier {
                Tier::Cheap => &settings.cheap,
                Tier::Medium => &settings.medium,
                Tier::Expensive => &settings.expensive,
            };
            TierPricing {
                model: entry.model.clone(),
                input_per_kunit: entry.input_per_kunit,
                output_per_kunit: entry.output_per_kunit,
                tier,
            }
        };
        Self {
            tiers: [
                entry(Tier::Cheap),
                entry(Tier::Medium),
                entry(Tier::Expensive),
            ],
        }
    }

    /// Look up pricing for a tier. Infallible: every tier is configured.
    pub fn get(&self, tier: Tier) -> &TierPricing {
        &self.tiers[tier.index()]
    }

    /// Look up pricing by model identifier: a linear scan across the three
    /// configured tiers.
    ///
    /// Returns `None` for an unrecognized model name; callers degrade to
    /// the `DEFAULT_*_PER_KUNIT` fallback pair so cost accounting never
    /// blocks on an unknown model.
    pub fn pricing_for_model(&self, model: &str) -> Option<&TierPricing> {
        self.tiers.iter().find(|pricing| pricing.model == model)
    }

    /// All three tiers in ascending price order, for reporting.
    pub fn iter(&self) -> impl Iterator<Item = &TierPricing> {
        self.tiers.iter()
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::from_config(&TierSettings::default())
    }
}
