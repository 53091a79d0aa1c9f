//! Link resolution cache using moka
//!
//! Infoboxes of the same category link the same chambers and countries over
//! and over. [`CachedLinkResolver`] memoizes per-site resolutions, including
//! misses, and can be shared by pages processed in parallel.

use crate::collab::{LinkResolver, SiteId, WikiPage};
use moka::sync::Cache;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of cached resolutions
    pub entry_count: u64,
}

/// Memoizing [`LinkResolver`] decorator
#[derive(Debug, Clone)]
pub struct CachedLinkResolver<R> {
    inner: R,
    cache: Cache<(SiteId, String), Option<WikiPage>>,
}

impl<R: LinkResolver> CachedLinkResolver<R> {
    /// Wrap `inner` with a cache of `max_capacity` entries
    #[inline]
    #[must_use]
    pub fn new(inner: R, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Wrap `inner` with a cache whose entries expire after `ttl`
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: R, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Wrapped resolver
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Forget every cached resolution
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

impl<R: LinkResolver> LinkResolver for CachedLinkResolver<R> {
    fn resolve_on(&self, link: &str, site: &SiteId) -> Option<WikiPage> {
        let key = (site.clone(), link.to_string());
        self.cache
            .get_with(key, || self.inner.resolve_on(link, site))
    }
}
