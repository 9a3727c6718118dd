//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Capacity-bounded config with no expiry.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ttl: None,
            tti: None,
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Rows that never change once written (committed selections).
    /// No TTL; entries leave on capacity pressure or after 6h without a read.
    pub fn immutable() -> Self {
        Self::with_capacity(20_000).tti(Duration::from_secs(6 * 3600))
    }

    /// Write-behind dedup for rows refreshed on every message.
    pub fn write_dedup() -> Self {
        Self::with_capacity(50_000).ttl(Duration::from_secs(3600))
    }
}
