//! Dynamically-typed values.
//!
//! [`AnyCache`] is the generic [`KeyCache`] instantiated with a type-erased value,
//! for callers that need to keep heterogeneous values under one cache. Values are
//! stored behind an `Arc`, so reads only bump a reference count.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::KeyCache;

/// A type-erased, shareable cache value
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// A cache holding values of any type
pub type AnyCache = KeyCache<AnyValue>;

/// Typed accessors for [`AnyCache`]
///
/// # Example
///
/// ```rust
/// use keycache_core::{AnyCache, AnyCacheExt, CacheConfig};
/// use std::time::Duration;
///
/// let cache = AnyCache::try_with_config(
///     CacheConfig::default().with_sweep_interval(Duration::ZERO),
/// ).unwrap();
///
/// cache.set_any("answer", 42u32);
/// cache.set_any("greeting", String::from("hello"));
///
/// assert_eq!(cache.get_as::<u32>("answer").as_deref(), Some(&42));
/// assert_eq!(cache.get_as::<u32>("greeting"), None);
/// ```
pub trait AnyCacheExt {
    /// Stores `value` under `key` with the cache's default TTL
    fn set_any<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V);

    /// Stores `value` under `key`, expiring `ttl` from now
    fn set_any_with_expiry<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V, ttl: Duration);

    /// Returns the value under `key` if it is present, not expired, and of type `V`
    fn get_as<V: Any + Send + Sync>(&self, key: &str) -> Option<Arc<V>>;
}

impl AnyCacheExt for AnyCache {
    fn set_any<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V) {
        self.set(key, Arc::new(value));
    }

    fn set_any_with_expiry<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_with_expiry(key, Arc::new(value), ttl);
    }

    fn get_as<V: Any + Send + Sync>(&self, key: &str) -> Option<Arc<V>> {
        self.get(key)?.downcast::<V>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::CacheConfig;

    fn create_any_cache(clock: Arc<ManualClock>) -> AnyCache {
        AnyCache::try_with_clock(
            CacheConfig::default().with_sweep_interval(Duration::ZERO),
            clock,
        )
        .unwrap()
    }

    #[derive(Debug, PartialEq)]
    struct Session {
        user_id: u64,
    }

    #[test]
    fn test_heterogeneous_values() {
        let cache = create_any_cache(Arc::new(ManualClock::new()));

        cache.set_any("count", 3usize);
        cache.set_any("session", Session { user_id: 9 });

        assert_eq!(cache.get_as::<usize>("count").as_deref(), Some(&3));
        assert_eq!(
            cache.get_as::<Session>("session").as_deref(),
            Some(&Session { user_id: 9 })
        );
    }

    #[test]
    fn test_wrong_type_is_none() {
        let cache = create_any_cache(Arc::new(ManualClock::new()));
        cache.set_any("count", 3usize);

        assert_eq!(cache.get_as::<String>("count"), None);
        // The raw value is still there
        assert!(cache.get("count").is_some());
    }

    #[test]
    fn test_any_value_expires() {
        let clock = Arc::new(ManualClock::new());
        let cache = create_any_cache(clock.clone());
        cache.set_any_with_expiry("token", "abc", Duration::from_millis(100));

        assert_eq!(cache.get_as::<&str>("token").as_deref(), Some(&"abc"));

        clock.advance(Duration::from_millis(100));
        assert_eq!(cache.get_as::<&str>("token"), None);
    }

    #[test]
    fn test_reads_share_allocation() {
        let cache = create_any_cache(Arc::new(ManualClock::new()));
        cache.set_any("blob", vec![0u8; 1024]);

        let first = cache.get_as::<Vec<u8>>("blob").unwrap();
        let second = cache.get_as::<Vec<u8>>("blob").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
