use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::clock::{Clock, SystemClock};
use crate::config::{CacheConfig, MAX_DURATION};
use crate::entry::Entry;
use crate::error::CacheError;

/// Internal shared state for the cache
struct Inner<T> {
    data: RwLock<HashMap<String, Entry<T>>>,
    default_ttl: Duration,
    /// Configured sweep interval plus this instance's jitter
    sweep_period: Duration,
    clock: Arc<dyn Clock>,
    /// Sender to signal shutdown to the sweep task.
    /// Dropping it (with the last handle) also stops the task.
    shutdown_tx: watch::Sender<bool>,
}

/// Thread-safe in-memory key-value cache with per-entry expiry
///
/// Every entry carries an absolute expiration instant fixed when it is written.
/// Expiry is enforced twice:
///
/// - **On read**: `get` treats an entry as absent from its expiration instant onward,
///   without removing it. Reads only take a shared lock.
/// - **On sweep**: a background task spawned at construction periodically takes the
///   exclusive lock and physically removes every expired entry.
///
/// `KeyCache` is a cheap handle; clones share the same data and sweep task. The sweep
/// task stops when [`KeyCache::shutdown`] is called or the last handle is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use keycache_core::{CacheConfig, KeyCache};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = CacheConfig::default()
///         .with_default_ttl(Duration::from_secs(300))
///         .with_sweep_interval(Duration::from_secs(30));
///     let cache: KeyCache<u64> = KeyCache::with_config(config);
///
///     cache.set("user:123", 42);
///     cache.set_with_expiry("session:abc", 7, Duration::from_secs(5));
///
///     assert_eq!(cache.get("user:123"), Some(42));
///     cache.delete("user:123");
/// }
/// ```
pub struct KeyCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> KeyCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new cache with default configuration (24h TTL, 1h sweep interval)
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. The cache requires
    /// a runtime to spawn its background sweep task.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a new cache with custom configuration
    ///
    /// # Panics
    ///
    /// Panics if the configuration enables the background sweep (non-zero interval)
    /// and no Tokio runtime is available. See [`KeyCache::try_with_config`].
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new cache reading time from `clock`
    ///
    /// # Panics
    ///
    /// Same conditions as [`KeyCache::with_config`].
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        match Self::try_with_clock(config, clock) {
            Ok(cache) => cache,
            Err(err) => panic!("keycache_core::KeyCache: {}", err),
        }
    }

    /// Creates a new cache, returning an error instead of panicking when no
    /// Tokio runtime is available for the sweep task
    pub fn try_with_config(config: CacheConfig) -> Result<Self, CacheError> {
        Self::try_with_clock(config, Arc::new(SystemClock))
    }

    /// Fallible counterpart of [`KeyCache::with_clock`]
    pub fn try_with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        let sweep_period = config.sweep_period();

        // Check for a runtime before building anything so the error is clean.
        let runtime = if sweep_period.is_zero() {
            None
        } else {
            Some(tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?)
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = Arc::new(Inner {
            data: RwLock::new(HashMap::new()),
            default_ttl: config.default_ttl,
            sweep_period,
            clock,
            shutdown_tx,
        });

        match runtime {
            Some(handle) => {
                handle.spawn(Self::sweep_task(Arc::downgrade(&inner), sweep_period, shutdown_rx));
            }
            None => tracing::debug!("Background sweep disabled (zero sweep interval)"),
        }

        Ok(Self { inner })
    }

    /// Background task that periodically sweeps expired entries.
    ///
    /// Holds only a weak reference so it never keeps a dropped cache alive.
    async fn sweep_task(
        inner: Weak<Inner<T>>,
        period: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(period);
        // After a stall, sweep once and resume the period from there instead of
        // replaying every missed tick under the exclusive lock
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // Skip the first immediate tick - we want to wait for the interval first
        ticker.tick().await;

        tracing::debug!("Sweep task started (period: {:?})", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(state) = inner.upgrade() else {
                        break;
                    };
                    Self::sweep(&state);
                }
                changed = shutdown_rx.changed() => {
                    // Err means the sender was dropped along with the cache
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Sweep task stopped");
    }

    /// Removes every entry that has expired as of a single "now" sample.
    ///
    /// Holds the exclusive lock for the whole scan. Shared between the background
    /// task and [`KeyCache::cleanup`].
    fn sweep(inner: &Inner<T>) -> usize {
        let mut data = inner.data.write();
        let now = inner.clock.now();

        let before = data.len();
        data.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - data.len();

        if removed > 0 {
            tracing::debug!("Swept {} expired entries ({} remaining)", removed, data.len());
        } else {
            tracing::trace!("Sweep found no expired entries ({} entries)", data.len());
        }

        removed
    }

    fn expires_at(&self, ttl: Duration) -> Instant {
        self.inner.clock.now() + ttl.min(MAX_DURATION)
    }

    /// Stores a value under `key` using the cache's default TTL
    ///
    /// If the key already exists, both its value and its expiry are replaced.
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.set_with_expiry(key, value, self.inner.default_ttl);
    }

    /// Stores a value under `key` that expires `ttl` from now
    ///
    /// If the key already exists, both its value and its expiry are replaced.
    /// A zero `ttl` stores an entry that is already expired. TTLs beyond ~100 years
    /// are capped.
    pub fn set_with_expiry(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let key = key.into();
        let mut data = self.inner.data.write();
        let expires_at = self.expires_at(ttl);
        data.insert(key, Entry::new(value, expires_at));
    }

    /// Retrieves a clone of the value stored under `key`
    ///
    /// Returns `None` if the key doesn't exist or has expired. Expired entries are
    /// left in place for the next sweep; reads never modify the cache.
    pub fn get(&self, key: &str) -> Option<T> {
        let data = self.inner.data.read();
        let entry = data.get(key)?;

        if entry.is_expired_at(self.inner.clock.now()) {
            return None;
        }

        Some(entry.value().clone())
    }

    /// Removes `key` from the cache. Does nothing if it is absent.
    pub fn delete(&self, key: &str) {
        self.inner.data.write().remove(key);
    }

    /// Checks if a key exists and is not expired
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        let data = self.inner.data.read();
        let now = self.inner.clock.now();
        data.get(key).is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Returns all keys that are not expired
    pub fn keys(&self) -> Vec<String> {
        let data = self.inner.data.read();
        let now = self.inner.clock.now();
        data.iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns the number of entries held (including expired ones not yet swept)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    /// Returns `true` if the cache holds no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Removes every entry, returning how many there were
    pub fn clear(&self) -> usize {
        let mut data = self.inner.data.write();
        let count = data.len();
        data.clear();
        count
    }

    /// Runs a sweep immediately
    ///
    /// Returns the number of entries removed.
    ///
    /// Note: This is also done automatically by the background task.
    pub fn cleanup(&self) -> usize {
        Self::sweep(&self.inner)
    }

    /// Returns the TTL applied by [`KeyCache::set`]
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Returns the effective sweep period (configured interval plus jitter)
    ///
    /// Zero means the background sweep is disabled.
    pub fn sweep_period(&self) -> Duration {
        self.inner.sweep_period
    }

    /// Stops the background sweep task
    ///
    /// This happens automatically when the last handle is dropped. After shutdown,
    /// expired entries are still hidden on read and can be removed with
    /// [`KeyCache::cleanup`].
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}

impl<T> Default for KeyCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for KeyCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for KeyCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCache")
            .field("len", &self.inner.data.read().len())
            .field("default_ttl", &self.inner.default_ttl)
            .field("sweep_period", &self.inner.sweep_period)
            .finish_non_exhaustive()
    }
}
