use rand::Rng;
use std::time::Duration;

use crate::error::CacheError;

/// Environment variable holding the default TTL in seconds
pub const DEFAULT_TTL_ENV: &str = "KEYCACHE_DEFAULT_TTL_SECS";

/// Environment variable holding the sweep interval in seconds
pub const SWEEP_INTERVAL_ENV: &str = "KEYCACHE_SWEEP_INTERVAL_SECS";

/// Environment variable toggling sweep jitter (`true`/`false`, `1`/`0`)
pub const SWEEP_JITTER_ENV: &str = "KEYCACHE_SWEEP_JITTER";

/// Upper bound for any duration the cache adds to an `Instant` (~100 years).
///
/// Longer TTLs and sweep periods are capped to this so the addition cannot overflow.
pub(crate) const MAX_DURATION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

const JITTER_MIN: Duration = Duration::from_secs(1);
const JITTER_MAX: Duration = Duration::from_secs(2);

/// Configuration for a cache instance
///
/// # Example
///
/// ```rust
/// use keycache_core::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_default_ttl(Duration::from_secs(300))
///     .with_sweep_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied by `set` (default: 24 hours)
    pub default_ttl: Duration,
    /// Nominal interval between background sweeps (default: 1 hour).
    /// Zero disables the background sweep.
    pub sweep_interval: Duration,
    /// Whether to add a random per-instance offset to the sweep interval (default: true)
    pub jitter: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
            jitter: true,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL used by `set` when no explicit expiry is given
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the sweep interval
    ///
    /// This determines how often the background task runs to remove expired entries.
    /// A zero interval disables the background task entirely; expired entries are then
    /// only hidden on read and removed by explicit calls to `cleanup`.
    ///
    /// # Arguments
    ///
    /// * `interval` - The nominal duration between sweeps
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Enables or disables the random sweep offset
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads:
    /// - `KEYCACHE_DEFAULT_TTL_SECS` - Default TTL in seconds
    /// - `KEYCACHE_SWEEP_INTERVAL_SECS` - Sweep interval in seconds
    /// - `KEYCACHE_SWEEP_JITTER` - `true`/`false` (or `1`/`0`)
    ///
    /// Unset variables keep their defaults. A malformed variable is logged as a
    /// warning and falls back to its own default; the others are still applied.
    /// Use [`CacheConfig::try_from_env`] to surface the error instead.
    pub fn from_env() -> Self {
        Self::from_lookup_lenient(|name| std::env::var(name).ok())
    }

    /// Like [`CacheConfig::from_env`], but fails on malformed values
    pub fn try_from_env() -> Result<Self, CacheError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CacheError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEFAULT_TTL_ENV) {
            config.default_ttl = parse_secs(DEFAULT_TTL_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SWEEP_INTERVAL_ENV) {
            config.sweep_interval = parse_secs(SWEEP_INTERVAL_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SWEEP_JITTER_ENV) {
            config.jitter = parse_flag(SWEEP_JITTER_ENV, &raw)?;
        }

        Ok(config)
    }

    fn from_lookup_lenient(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: parse_or_default(&lookup, DEFAULT_TTL_ENV, parse_secs, defaults.default_ttl),
            sweep_interval: parse_or_default(&lookup, SWEEP_INTERVAL_ENV, parse_secs, defaults.sweep_interval),
            jitter: parse_or_default(&lookup, SWEEP_JITTER_ENV, parse_flag, defaults.jitter),
        }
    }

    /// Picks the effective sweep period: the configured interval plus a random jitter.
    ///
    /// Called once per cache instance; the result is fixed for that instance's lifetime.
    pub(crate) fn sweep_period(&self) -> Duration {
        if self.sweep_interval.is_zero() || !self.jitter {
            return self.sweep_interval.min(MAX_DURATION);
        }

        let (low, high) = jitter_bounds(self.sweep_interval);
        let jitter = if high > low {
            rand::rng().random_range(low..high)
        } else {
            low
        };

        self.sweep_interval.saturating_add(jitter).min(MAX_DURATION)
    }
}

/// Jitter range for a given sweep interval.
///
/// Nominally `[1s, 2s)`, but never more than `[interval / 10, interval / 5)` so that
/// short intervals are not dominated by the offset.
fn jitter_bounds(interval: Duration) -> (Duration, Duration) {
    let low = JITTER_MIN.min(interval / 10);
    let high = JITTER_MAX.min(interval / 5);
    (low, high)
}

fn parse_or_default<V>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: fn(&str, &str) -> Result<V, CacheError>,
    default: V,
) -> V {
    match lookup(name) {
        Some(raw) => parse(name, &raw).unwrap_or_else(|err| {
            tracing::warn!("{}; using default for {}", err, name);
            default
        }),
        None => default,
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration, CacheError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| CacheError::InvalidConfig(format!("{}={:?} is not a number of seconds", name, raw)))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, CacheError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CacheError::InvalidConfig(format!("{}={:?} is not a boolean", name, raw))),
    }
}
