// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend for deterministic testing.
//!
//! `MockBackend` implements [`Backend`] with pre-configured replies,
//! enabling fast, CI-runnable tests without external calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tollbooth_core::{Backend, BackendRequest, BackendResponse, TollboothError, UnitUsage};

/// One scripted reply: payload plus usage metadata.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub text: String,
    pub usage: UnitUsage,
    pub latency: Duration,
}

impl MockReply {
    /// A reply with the given text and unit counts, and a nominal latency.
    pub fn new(text: &str, input_units: u64, output_units: u64) -> Self {
        Self {
            text: text.to_string(),
            usage: UnitUsage::new(input_units, output_units),
            latency: Duration::from_millis(5),
        }
    }
}

/// A mock backend that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" reply is returned. A scripted failure is returned as a
/// `TollboothError::Backend` without consuming anything else.
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<Result<MockReply, String>>>>,
    invocations: AtomicUsize,
}

impl MockBackend {
    /// Create a new mock backend with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Create a mock backend pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        let queue: VecDeque<_> = replies.into_iter().map(Ok).collect();
        Self {
            replies: Arc::new(Mutex::new(queue)),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(Ok(reply));
    }

    /// Queue a scripted failure with the given message.
    pub async fn push_failure(&self, message: &str) {
        self.replies.lock().await.push_back(Err(message.to_string()));
    }

    /// Number of times `invoke` was called.
    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Pop the next scripted outcome, or the default reply.
    async fn next(&self) -> Result<MockReply, String> {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(MockReply::new("mock response", 10, 20)))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MockBackend {
    type Value = String;

    async fn invoke(
        &self,
        _request: BackendRequest,
    ) -> Result<BackendResponse<String>, TollboothError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match self.next().await {
            Ok(reply) => Ok(BackendResponse {
                value: reply.text,
                usage: reply.usage,
                latency: reply.latency,
            }),
            Err(message) => Err(TollboothError::Backend {
                message,
                source: None,
            }),
        }
    }
}
