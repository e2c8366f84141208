//! # Cache Module
//!
//! The shared TTL cache, its key scheme, and the background sweeper that
//! purges expired entries.

pub mod keys;
pub mod ttl_cache;

pub use keys::CacheKey;
pub use ttl_cache::{CacheStats, TtlCache};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Spawn a task that purges expired entries every `every`.
///
/// Reads never depend on this running; it only bounds how long dead entries
/// occupy memory.
pub fn spawn_sweeper(cache: Arc<TtlCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if cache.is_empty() {
                continue;
            }
            let removed = cache.purge_expired();
            debug!("[Cache] Sweep removed {} entries, {} remain", removed, cache.len());
        }
    })
}
