// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache-or-compute-and-charge coordination.
//!
//! Per request: derive key -> cache lookup -> on hit return (free) -> on
//! miss invoke the backend -> on success record cost, store, return. A
//! backend failure propagates unchanged and leaves cache and cost state
//! exactly as they were before the call began.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use tollbooth_cache::{CacheKey, KeyPart, TtlCache, derive_key};
use tollbooth_config::TollboothConfig;
use tollbooth_core::{Backend, BackendRequest, GenerationParams, Tier, TollboothError};
use tollbooth_cost::{CostTracker, TierCatalog};

/// Key namespace for completion dispatches.
const KEY_PREFIX: &str = "completion";

/// The outcome of one dispatch: the payload plus accounting metadata.
#[derive(Debug, Clone)]
pub struct Dispatch<T> {
    /// The response payload, cached or fresh.
    pub value: T,
    /// Whether the value came from the cache.
    pub cache_hit: bool,
    /// Cost recorded for this call. Zero on cache hits, which are free.
    pub cost_usd: f64,
    /// Backend wall-clock latency. `None` on cache hits.
    pub latency: Option<Duration>,
}

/// Composes key derivation, the TTL cache, and the cost tracker around a
/// single backend invocation.
///
/// All components are constructed once at startup and shared via `Arc`;
/// nothing is lazily initialized. Many request tasks dispatch concurrently
/// against one router.
pub struct Router<B: Backend> {
    backend: Arc<B>,
    cache: Arc<TtlCache<B::Value>>,
    tracker: Arc<CostTracker>,
}

impl<B: Backend> Router<B> {
    /// Create a router over explicitly constructed components.
    pub fn new(
        backend: Arc<B>,
        cache: Arc<TtlCache<B::Value>>,
        tracker: Arc<CostTracker>,
    ) -> Self {
        Self {
            backend,
            cache,
            tracker,
        }
    }

    /// Assemble a router and its components from startup configuration.
    pub fn from_config(config: &TollboothConfig, backend: Arc<B>) -> Self {
        let cache = Arc::new(TtlCache::from_config(&config.cache));
        let tracker = Arc::new(CostTracker::new(TierCatalog::from_config(&config.tiers)));
        Self::new(backend, cache, tracker)
    }

    /// The response cache, shared for janitor wiring and inspection.
    pub fn cache(&self) -> &Arc<TtlCache<B::Value>> {
        &self.cache
    }

    /// The cost tracker, shared for reporting.
    pub fn tracker(&self) -> &Arc<CostTracker> {
        &self.tracker
    }

    /// Resolve one request: cached answer if present, otherwise invoke the
    /// backend, charge for it, and cache the result.
    ///
    /// Cache hits never touch the cost tracker. A backend failure is
    /// propagated unchanged; neither the cache nor the tracker is modified
    /// on any path that does not produce a fresh successful response, so an
    /// abandoned call leaves no partial state.
    ///
    /// Concurrent misses for the same key are not deduplicated: each one
    /// independently invokes the backend and records cost. Results are
    /// idempotent, so this costs money, not correctness.
    pub async fn dispatch(
        &self,
        tier: Tier,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Dispatch<B::Value>, TollboothError> {
        let key = completion_key(tier, prompt, params)?;

        if let Some(value) = self.cache.get(&key) {
            debug!(key = %key, tier = %tier, "cache hit");
            return Ok(Dispatch {
                value,
                cache_hit: true,
                cost_usd: 0.0,
                latency: None,
            });
        }

        debug!(key = %key, tier = %tier, "cache miss, invoking backend");
        let request = BackendRequest {
            tier,
            prompt: prompt.to_string(),
            params: *params,
        };
        let response = self.backend.invoke(request).await?;

        let cost_usd = self.tracker.record(tier, response.usage);
        self.cache.set(key, response.value.clone());

        Ok(Dispatch {
            value: response.value,
            cache_hit: false,
            cost_usd,
            latency: Some(response.latency),
        })
    }
}

/// Derive the cache key for a completion request.
///
/// Tier and normalized prompt are positional (order-sensitive); generation
/// parameters are named (order-insensitive).
fn completion_key(
    tier: Tier,
    prompt: &str,
    params: &GenerationParams,
) -> Result<CacheKey, TollboothError> {
    derive_key(
        KEY_PREFIX,
        &[tier.to_string().into(), prompt.into()],
        &[
            ("max_units", KeyPart::UInt(u64::from(params.max_units))),
            ("temperature", params.temperature.into()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tollbooth_core::{BackendResponse, UnitUsage};

    use super::*;

    /// A scripted backend: fixed reply and usage, optional failure, and an
    /// invocation counter.
    struct StubBackend {
        reply: String,
        usage: UnitUsage,
        fail: bool,
        invocations: AtomicUsize,
        barrier: Option<tokio::sync::Barrier>,
    }

    impl StubBackend {
        fn replying(reply: &str, usage: UnitUsage) -> Self {
            Self {
                reply: reply.to_string(),
                usage,
                fail: false,
                invocations: AtomicUsize::new(0),
                barrier: None,
            }
        }

        fn failing() -> Self {
            Self {
                reply: String::new(),
                usage: UnitUsage::default(),
                fail: true,
                invocations: AtomicUsize::new(0),
                barrier: None,
            }
        }

        fn invocations(&self) -> usize {
            self.invocations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for StubBackend {
        type Value = String;

        async fn invoke(
            &self,
            _request: BackendRequest,
        ) -> Result<BackendResponse<String>, TollboothError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.fail {
                return Err(TollboothError::Backend {
                    message: "scripted failure".into(),
                    source: None,
                });
            }
            Ok(BackendResponse {
                value: self.reply.clone(),
                usage: self.usage,
                latency: Duration::from_millis(5),
            })
        }
    }

    fn router_with(backend: StubBackend) -> Router<StubBackend> {
        Router::from_config(&TollboothConfig::default(), Arc::new(backend))
    }

    #[tokio::test]
    async fn miss_invokes_backend_and_records_cost() {
        let router = router_with(StubBackend::replying("fresh", UnitUsage::new(1000, 1000)));

        let out = router
            .dispatch(Tier::Medium, "what is rust?", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(out.value, "fresh");
        assert!(!out.cache_hit);
        // Default medium pricing (0.001, 0.002): 1000 in + 1000 out = 0.003.
        assert!((out.cost_usd - 0.003).abs() < 1e-12);
        assert!(out.latency.is_some());
        assert_eq!(router.cache().len(), 1);
        assert!((router.tracker().total_usd() - 0.003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn hit_is_free_and_skips_the_backend() {
        let router = router_with(StubBackend::replying("answer", UnitUsage::new(500, 500)));
        let params = GenerationParams::default();

        router.dispatch(Tier::Cheap, "question", &params).await.unwrap();
        let before = router.tracker().snapshot();

        let out = router.dispatch(Tier::Cheap, "question", &params).await.unwrap();

        assert!(out.cache_hit);
        assert_eq!(out.value, "answer");
        assert_eq!(out.cost_usd, 0.0);
        assert!(out.latency.is_none());
        assert_eq!(router.backend.invocations(), 1);
        // A hit never changes any tracker total.
        assert_eq!(router.tracker().snapshot(), before);
    }

    #[tokio::test]
    async fn prompt_normalization_folds_textual_variants_into_hits() {
        let router = router_with(StubBackend::replying("r", UnitUsage::new(10, 10)));
        let params = GenerationParams::default();

        router
            .dispatch(Tier::Medium, "What is  Rust?", &params)
            .await
            .unwrap();
        let out = router
            .dispatch(Tier::Medium, "  what is rust? ", &params)
            .await
            .unwrap();

        assert!(out.cache_hit);
        assert_eq!(router.backend.invocations(), 1);
    }

    #[tokio::test]
    async fn tier_and_params_separate_cache_entries() {
        let router = router_with(StubBackend::replying("r", UnitUsage::new(10, 10)));
        let params = GenerationParams::default();

        router.dispatch(Tier::Cheap, "q", &params).await.unwrap();

        let out = router.dispatch(Tier::Medium, "q", &params).await.unwrap();
        assert!(!out.cache_hit, "different tier must miss");

        let hotter = GenerationParams {
            temperature: Some(0.9),
            ..params
        };
        let out = router.dispatch(Tier::Cheap, "q", &hotter).await.unwrap();
        assert!(!out.cache_hit, "different params must miss");

        assert_eq!(router.backend.invocations(), 3);
    }

    #[tokio::test]
    async fn backend_failure_leaves_no_partial_state() {
        let router = router_with(StubBackend::failing());
        let cache_before = router.cache().len();
        let totals_before = router.tracker().snapshot();

        let err = router
            .dispatch(Tier::Expensive, "q", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TollboothError::Backend { .. }));
        assert_eq!(router.cache().len(), cache_before);
        assert_eq!(router.tracker().snapshot(), totals_before);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_causes_a_fresh_charge() {
        let router = router_with(StubBackend::replying("r", UnitUsage::new(1000, 1000)));
        let params = GenerationParams::default();

        router.dispatch(Tier::Medium, "q", &params).await.unwrap();

        // Default TTL is 3600s.
        tokio::time::advance(Duration::from_secs(3601)).await;

        let out = router.dispatch(Tier::Medium, "q", &params).await.unwrap();
        assert!(!out.cache_hit);
        assert_eq!(router.backend.invocations(), 2);
        assert!((router.tracker().total_usd() - 0.006).abs() < 1e-12);
    }

    #[tokio::test]
    async fn concurrent_same_key_misses_both_invoke_and_both_charge() {
        let mut backend = StubBackend::replying("r", UnitUsage::new(1000, 1000));
        // Both dispatches must be in flight at once; a single-flight router
        // would deadlock here.
        backend.barrier = Some(tokio::sync::Barrier::new(2));
        let router = Arc::new(router_with(backend));
        let params = GenerationParams::default();

        let a = {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                router.dispatch(Tier::Medium, "same", &params).await
            })
        };
        let b = {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                router.dispatch(Tier::Medium, "same", &params).await
            })
        };

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert!(!a.cache_hit);
        assert!(!b.cache_hit);
        assert_eq!(router.backend.invocations(), 2);
        assert_eq!(router.tracker().call_count(), 2);
    }
}
