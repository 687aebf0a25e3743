// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness assembling a complete Tollbooth stack over a mock backend.
//!
//! `TestStack` wires default configuration, catalog, tracker, cache, and a
//! router around a [`MockBackend`]. Integration and e2e tests drive the
//! full dispatch pipeline through it.

use std::sync::Arc;

use tollbooth_config::TollboothConfig;
use tollbooth_core::{GenerationParams, Tier, TollboothError};
use tollbooth_router::{Dispatch, Router};

use crate::mock_backend::{MockBackend, MockReply};

/// Builder for creating test stacks with configurable options.
pub struct TestStackBuilder {
    replies: Vec<MockReply>,
    config: TollboothConfig,
}

impl TestStackBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            config: TollboothConfig::default(),
        }
    }

    /// Set mock backend replies.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Cap the cache at `max_entries`.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.config.cache.max_entries = max_entries;
        self
    }

    /// Override the default cache TTL.
    pub fn with_default_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache.default_ttl_secs = secs;
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: TollboothConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the stack.
    pub fn build(self) -> TestStack {
        let backend = Arc::new(MockBackend::with_replies(self.replies));
        let router = Router::from_config(&self.config, Arc::clone(&backend));
        TestStack { backend, router }
    }
}

/// A fully wired Tollbooth stack over a mock backend.
pub struct TestStack {
    pub backend: Arc<MockBackend>,
    pub router: Router<MockBackend>,
}

impl TestStack {
    pub fn builder() -> TestStackBuilder {
        TestStackBuilder::new()
    }

    /// Dispatch a prompt with default generation parameters.
    pub async fn dispatch(
        &self,
        tier: Tier,
        prompt: &str,
    ) -> Result<Dispatch<String>, TollboothError> {
        self.router
            .dispatch(tier, prompt, &GenerationParams::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stack_round_trips_a_reply() {
        let stack = TestStack::builder()
            .with_replies(vec![MockReply::new("wired", 10, 10)])
            .build();

        let out = stack.dispatch(Tier::Cheap, "hello").await.unwrap();
        assert_eq!(out.value, "wired");
        assert!(!out.cache_hit);
    }
}
