// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic running totals of spend, per tier and global.
//!
//! Accumulation uses independent atomic counters rather than any lock, so
//! cost accounting never contends with cache traffic. Totals are stored as
//! integer nano-USD; a single `fetch_add` per counter makes them
//! monotonically non-decreasing for the lifetime of the process.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use tollbooth_core::{Tier, UnitUsage};

use crate::catalog::{
    DEFAULT_INPUT_PER_KUNIT, DEFAULT_OUTPUT_PER_KUNIT, TierCatalog, TierPricing,
};

const NANOS_PER_USD: f64 = 1_000_000_000.0;

/// Calculate cost in USD for a unit usage under a tier's pricing.
///
/// Formula: `input/1000 * input_price + output/1000 * output_price`.
pub fn calculate_cost(usage: &UnitUsage, pricing: &TierPricing) -> f64 {
    usage.input_units as f64 / 1_000.0 * pricing.input_per_kunit
        + usage.output_units as f64 / 1_000.0 * pricing.output_per_kunit
}

/// A consistent point read of accumulated spend.
///
/// Reads are independent atomic loads; a snapshot reflects a true historical
/// state under concurrent writers, though it need not be linearizable with a
/// half-completed `record` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSnapshot {
    /// Total spend across all tiers, USD.
    pub total_usd: f64,
    /// Spend per tier, indexed in `Tier::ALL` order.
    pub by_tier: [(Tier, f64); 3],
    /// Number of recorded calls.
    pub calls: u64,
}

impl CostSnapshot {
    /// Spend for one tier.
    pub fn tier_usd(&self, tier: Tier) -> f64 {
        self.by_tier[tier.index()].1
    }
}

/// Accumulates spend using tier pricing resolved through the catalog.
pub struct CostTracker {
    catalog: TierCatalog,
    total_nanos: AtomicU64,
    tier_nanos: [AtomicU64; 3],
    calls: AtomicU64,
}

impl CostTracker {
    /// Create a tracker with zero totals over the given catalog.
    pub fn new(catalog: TierCatalog) -> Self {
        Self {
            catalog,
            total_nanos: AtomicU64::new(0),
            tier_nanos: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            calls: AtomicU64::new(0),
        }
    }

    /// The pricing catalog this tracker resolves against.
    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    /// Record a completed call against a tier, returning the computed cost.
    ///
    /// Adds atomically to the global total and the per-tier total, and
    /// increments the call counter.
    pub fn record(&self, tier: Tier, usage: UnitUsage) -> f64 {
        let pricing = self.catalog.get(tier);
        let cost_usd = calculate_cost(&usage, pricing);
        self.add(tier, cost_usd);

        info!(
            tier = %tier,
            model = %pricing.model,
            input_units = usage.input_units,
            output_units = usage.output_units,
            cost_usd,
            "cost recorded"
        );
        cost_usd
    }

    /// Record a completed call identified by model name.
    ///
    /// An unrecognized model name degrades to the fixed fallback pricing
    /// pair, is attributed to the medium tier, and is logged as an anomaly.
    /// Cost accounting always completes.
    pub fn record_for_model(&self, model: &str, usage: UnitUsage) -> f64 {
        match self.catalog.pricing_for_model(model) {
            Some(pricing) => {
                let tier = pricing.tier;
                let cost_usd = calculate_cost(&usage, pricing);
                self.add(tier, cost_usd);
                info!(
                    tier = %tier,
                    model,
                    input_units = usage.input_units,
                    output_units = usage.output_units,
                    cost_usd,
                    "cost recorded"
                );
                cost_usd
            }
            None => {
                warn!(model, "unrecognized model name, using fallback pricing");
                let cost_usd = usage.input_units as f64 / 1_000.0 * DEFAULT_INPUT_PER_KUNIT
                    + usage.output_units as f64 / 1_000.0 * DEFAULT_OUTPUT_PER_KUNIT;
                self.add(Tier::Medium, cost_usd);
                cost_usd
            }
        }
    }

    /// Total spend across all tiers, USD.
    pub fn total_usd(&self) -> f64 {
        nanos_to_usd(self.total_nanos.load(Ordering::Relaxed))
    }

    /// Spend for one tier, USD.
    pub fn tier_usd(&self, tier: Tier) -> f64 {
        nanos_to_usd(self.tier_nanos[tier.index()].load(Ordering::Relaxed))
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Read all counters as one snapshot.
    pub fn snapshot(&self) -> CostSnapshot {
        CostSnapshot {
            total_usd: self.total_usd(),
            by_tier: Tier::ALL.map(|tier| (tier, self.tier_usd(tier))),
            calls: self.call_count(),
        }
    }

    fn add(&self, tier: Tier, cost_usd: f64) {
        let nanos = usd_to_nanos(cost_usd);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.tier_nanos[tier.index()].fetch_add(nanos, Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

fn usd_to_nanos(usd: f64) -> u64 {
    (usd * NANOS_PER_USD).round() as u64
}

fn nanos_to_usd(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_USD
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn tracker() -> CostTracker {
        CostTracker::new(TierCatalog::default())
    }

    #[test]
    fn record_computes_per_thousand_cost() {
        let tracker = tracker();
        // Default medium tier is priced (0.001, 0.002) per thousand units.
        let cost = tracker.record(Tier::Medium, UnitUsage::new(1000, 1000));
        assert!((cost - 0.003).abs() < 1e-12, "expected 0.003, got {cost}");
        assert!((tracker.total_usd() - 0.003).abs() < 1e-12);
    }

    #[test]
    fn record_attributes_spend_to_the_tier() {
        let tracker = tracker();
        tracker.record(Tier::Cheap, UnitUsage::new(2000, 0));
        tracker.record(Tier::Expensive, UnitUsage::new(0, 1000));

        // cheap: 2000/1000 * 0.0005 = 0.001
        assert!((tracker.tier_usd(Tier::Cheap) - 0.001).abs() < 1e-12);
        // expensive: 1000/1000 * 0.01 = 0.01
        assert!((tracker.tier_usd(Tier::Expensive) - 0.01).abs() < 1e-12);
        assert_eq!(tracker.tier_usd(Tier::Medium), 0.0);
        assert_eq!(tracker.call_count(), 2);
    }

    #[test]
    fn totals_never_decrease() {
        let tracker = tracker();
        let mut last = 0.0;
        for _ in 0..50 {
            tracker.record(Tier::Cheap, UnitUsage::new(100, 100));
            let total = tracker.total_usd();
            assert!(total >= last);
            last = total;
        }
    }

    #[test]
    fn zero_usage_zero_cost_still_counts_the_call() {
        let tracker = tracker();
        let cost = tracker.record(Tier::Medium, UnitUsage::default());
        assert_eq!(cost, 0.0);
        assert_eq!(tracker.total_usd(), 0.0);
        assert_eq!(tracker.call_count(), 1);
    }

    #[test]
    fn record_for_model_resolves_configured_models() {
        let tracker = tracker();
        let cost = tracker.record_for_model("swift-ultra", UnitUsage::new(1000, 1000));
        // expensive: 0.005 + 0.01
        assert!((cost - 0.015).abs() < 1e-12);
        assert!((tracker.tier_usd(Tier::Expensive) - 0.015).abs() < 1e-12);
    }

    #[test]
    #[traced_test]
    fn unknown_model_degrades_to_fallback_pricing() {
        let tracker = tracker();
        let cost = tracker.record_for_model("mystery-9000", UnitUsage::new(1000, 1000));
        // Fallback pair (0.001, 0.002), attributed to medium.
        assert!((cost - 0.003).abs() < 1e-12);
        assert!((tracker.tier_usd(Tier::Medium) - 0.003).abs() < 1e-12);
        assert_eq!(tracker.call_count(), 1);
        assert!(logs_contain("unrecognized model name"));
    }

    #[test]
    fn snapshot_is_internally_consistent() {
        let tracker = tracker();
        tracker.record(Tier::Cheap, UnitUsage::new(1000, 1000));
        tracker.record(Tier::Medium, UnitUsage::new(1000, 1000));

        let snap = tracker.snapshot();
        let by_tier_sum: f64 = snap.by_tier.iter().map(|(_, usd)| usd).sum();
        assert!((snap.total_usd - by_tier_sum).abs() < 1e-12);
        assert_eq!(snap.calls, 2);
        assert_eq!(snap.tier_usd(Tier::Expensive), 0.0);
    }

    #[test]
    fn concurrent_records_sum_exactly() {
        use std::sync::Arc;

        let tracker = Arc::new(tracker());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    tracker.record(Tier::Medium, UnitUsage::new(1000, 1000));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 400 calls at exactly 0.003 each; nano-USD counters make the sum
        // exact.
        assert_eq!(tracker.call_count(), 400);
        assert!((tracker.total_usd() - 1.2).abs() < 1e-9);
    }
}
