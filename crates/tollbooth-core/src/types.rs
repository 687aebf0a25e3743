// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Tollbooth workspace.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A named pricing/quality class for a backend computation.
///
/// Each tier carries a model identifier and fixed per-thousand-unit
/// input/output pricing in the tier catalog. Which tier to pick for a given
/// request is the caller's policy, not ours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Cheap,
    Medium,
    Expensive,
}

impl Tier {
    /// All tiers, in ascending price order.
    pub const ALL: [Tier; 3] = [Tier::Cheap, Tier::Medium, Tier::Expensive];

    /// Stable index for per-tier counter arrays.
    pub const fn index(self) -> usize {
        match self {
            Tier::Cheap => 0,
            Tier::Medium => 1,
            Tier::Expensive => 2,
        }
    }
}

/// Consumed input/output units for one backend call.
///
/// Units are the countable quantity that per-thousand pricing applies to
/// (for model inference backends, tokens).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitUsage {
    /// Units consumed by the request payload.
    pub input_units: u64,
    /// Units produced in the response.
    pub output_units: u64,
}

impl UnitUsage {
    pub fn new(input_units: u64, output_units: u64) -> Self {
        Self {
            input_units,
            output_units,
        }
    }
}

/// Generation parameters forwarded to the backend.
///
/// These participate in cache key derivation: two requests that differ only
/// in generation parameters are distinct requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum output units the backend may produce.
    pub max_units: u32,
    /// Sampling temperature, if the backend supports one.
    pub temperature: Option<f64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_units: 1024,
            temperature: None,
        }
    }
}

/// A request handed to a backend for one computation.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// The pricing tier selected by the caller.
    pub tier: Tier,
    /// The request payload (e.g. prompt text), already normalized upstream.
    pub prompt: String,
    /// Generation parameters.
    pub params: GenerationParams,
}

/// A successful backend response: payload plus usage metadata.
#[derive(Debug, Clone)]
pub struct BackendResponse<T> {
    /// The computed payload.
    pub value: T,
    /// Input/output unit counts for cost accounting.
    pub usage: UnitUsage,
    /// Wall-clock latency of the backend call. Observability only; never
    /// consulted by cache or cost logic.
    pub latency: Duration,
}
