// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for the expensive computation the cache shields.

use async_trait::async_trait;

use crate::error::TollboothError;
use crate::types::{BackendRequest, BackendResponse};

/// The external collaborator that performs the expensive computation.
///
/// Implementations own the network transport, authentication, and retry
/// policy for a concrete backend (a paid model-inference API, typically).
/// The core only requires that a successful call report its payload together
/// with input/output unit counts and wall-clock latency.
///
/// This is the only operation in the system expected to suspend for
/// meaningful wall-clock time. It is never awaited under a core-owned lock,
/// so concurrent invocations for different requests proceed fully in
/// parallel.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// The response payload type. Cloned on cache hits.
    type Value: Clone + Send + Sync + 'static;

    /// Perform the computation for one request.
    async fn invoke(
        &self,
        request: BackendRequest,
    ) -> Result<BackendResponse<Self::Value>, TollboothError>;
}
