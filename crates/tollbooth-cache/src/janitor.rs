// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background sweep task for expired cache entries.
//!
//! Lazy expiration only removes entries that get accessed; entries that are
//! never looked up again would otherwise sit in the table until evicted.
//! The janitor runs [`TtlCache::cleanup_expired`] on a fixed interval, off
//! the request path.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::store::TtlCache;

/// Spawn a periodic task sweeping expired entries from the cache.
///
/// Sweeps every `every` interval until the returned handle is aborted or
/// the runtime shuts down. The task holds a strong `Arc`, so the cache is
/// released only once the handle is aborted.
pub fn spawn_cleanup<V>(cache: Arc<TtlCache<V>>, every: Duration) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = cache.cleanup_expired();
            if removed > 0 {
                debug!(removed, "swept expired cache entries");
            }
        }
    })
}
