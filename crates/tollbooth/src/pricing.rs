// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tollbooth pricing` command implementation.
//!
//! Prints the three-tier pricing table resolved from configuration.

use tollbooth_config::TollboothConfig;
use tollbooth_cost::TierCatalog;

/// Run the `tollbooth pricing` command.
pub fn run_pricing(config: &TollboothConfig) {
    let catalog = TierCatalog::from_config(&config.tiers);

    println!(
        "{:<10} {:<16} {:>14} {:>14}",
        "tier", "model", "input $/1k", "output $/1k"
    );
    for pricing in catalog.iter() {
        println!(
            "{:<10} {:<16} {:>14} {:>14}",
            pricing.tier.to_string(),
            pricing.model,
            pricing.input_per_kunit,
            pricing.output_per_kunit
        );
    }
}
