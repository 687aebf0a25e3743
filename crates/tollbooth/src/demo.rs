// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tollbooth demo` command implementation.
//!
//! Runs a fixed prompt set through a router over an in-process echo backend,
//! demonstrating hit/miss behavior, eviction, and the cost snapshot. The
//! echo backend stands in for a real inference adapter; it reports unit
//! counts derived from payload length so the cost arithmetic is visible.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use tollbooth_cache::spawn_cleanup;
use tollbooth_config::TollboothConfig;
use tollbooth_core::{
    Backend, BackendRequest, BackendResponse, GenerationParams, Tier, TollboothError, UnitUsage,
};
use tollbooth_router::Router;

/// An in-process backend that echoes the prompt back.
struct EchoBackend;

#[async_trait]
impl Backend for EchoBackend {
    type Value = String;

    async fn invoke(
        &self,
        request: BackendRequest,
    ) -> Result<BackendResponse<String>, TollboothError> {
        let started = std::time::Instant::now();
        let value = format!("[{}] {}", request.tier, request.prompt);

        // Rough unit estimate: one unit per four characters, floor of one.
        let input_units = (request.prompt.len() as u64 / 4).max(1);
        let output_units = (value.len() as u64 / 4).max(1);

        Ok(BackendResponse {
            value,
            usage: UnitUsage::new(input_units, output_units),
            latency: started.elapsed(),
        })
    }
}

/// Tier selection stands in for the caller-owned routing policy: longer
/// prompts get pricier tiers.
fn pick_tier(prompt: &str) -> Tier {
    match prompt.len() {
        0..=24 => Tier::Cheap,
        25..=60 => Tier::Medium,
        _ => Tier::Expensive,
    }
}

/// Run the `tollbooth demo` command.
pub async fn run_demo(config: &TollboothConfig) -> Result<(), TollboothError> {
    let router = Router::new(
        Arc::new(EchoBackend),
        Arc::new(tollbooth_cache::TtlCache::from_config(&config.cache)),
        Arc::new(tollbooth_cost::CostTracker::new(
            tollbooth_cost::TierCatalog::from_config(&config.tiers),
        )),
    );

    let janitor = spawn_cleanup(
        Arc::clone(router.cache()),
        Duration::from_secs(config.cache.cleanup_interval_secs),
    );

    // Deliberate near-duplicates: the second and fifth prompts differ from
    // earlier ones only by case and spacing, so they hit.
    let prompts = [
        "What is a monad?",
        "what IS a   monad?",
        "Summarize the plot of Moby-Dick in three sentences.",
        "Translate 'good morning' to French.",
        "  summarize the plot of moby-dick in three sentences.",
    ];

    let params = GenerationParams::default();
    for prompt in prompts {
        let tier = pick_tier(prompt);
        let out = router.dispatch(tier, prompt, &params).await?;
        let source = if out.cache_hit { "hit " } else { "miss" };
        println!(
            "{source}  tier={tier:<9} cost=${:<10.6} {prompt:?}",
            out.cost_usd
        );
    }

    let snapshot = router.tracker().snapshot();
    println!();
    println!("calls      = {}", snapshot.calls);
    println!("total      = ${:.6}", snapshot.total_usd);
    for (tier, usd) in snapshot.by_tier {
        println!("{tier:<10} = ${usd:.6}");
    }
    println!("cached     = {}", router.cache().len());

    info!(
        calls = snapshot.calls,
        total_usd = snapshot.total_usd,
        "demo complete"
    );

    janitor.abort();
    Ok(())
}
