// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered pricing and cost accounting for Tollbooth.
//!
//! This crate provides:
//! - **Tier catalog**: the static three-tier pricing registry with
//!   by-model lookup and fixed fallback pricing
//! - **Cost tracker**: lock-free accumulation of spend via atomic counters,
//!   with consistent snapshot reads

pub mod catalog;
pub mod tracker;

pub use catalog::{DEFAULT_INPUT_PER_KUNIT, DEFAULT_OUTPUT_PER_KUNIT, TierCatalog, TierPricing};
pub use tracker::{CostSnapshot, CostTracker, calculate_cost};
