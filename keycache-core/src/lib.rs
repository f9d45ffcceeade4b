//! # KeyCache Core
//!
//! A thread-safe, in-memory key-value cache with per-entry expiry.
//!
//! ## Features
//!
//! - Generic over the stored value type, with a type-erased [`AnyCache`] variant
//! - Shared/exclusive locking: reads never block other reads
//! - Expiration on read (an expired entry is never returned)
//! - Background sweep task per cache instance, jittered so caches don't sweep in lockstep
//! - Injectable [`Clock`] for deterministic tests
//! - JSON helpers behind the `json` feature (enabled by default)
//!
//! ## Example
//!
//! ```rust,no_run
//! use keycache_core::{CacheConfig, KeyCache};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Default config: 24h TTL, sweep every hour (plus jitter)
//!     let cache: KeyCache<String> = KeyCache::new();
//!
//!     // Or with custom settings
//!     let config = CacheConfig::default()
//!         .with_default_ttl(Duration::from_secs(60))
//!         .with_sweep_interval(Duration::from_secs(30));
//!     let cache: KeyCache<String> = KeyCache::with_config(config);
//!
//!     // Store with the default TTL, or with an explicit one
//!     cache.set("user:123", "John Doe".to_string());
//!     cache.set_with_expiry("otp:123", "481516".to_string(), Duration::from_secs(5));
//!
//!     if let Some(name) = cache.get("user:123") {
//!         println!("User: {}", name);
//!     }
//!
//!     cache.delete("user:123");
//!
//!     // Manual sweep (also done automatically by the background task)
//!     let removed_count = cache.cleanup();
//! }
//! ```

mod cache;
mod clock;
mod config;
mod dynamic;
mod entry;
mod error;
#[cfg(feature = "json")]
mod json;

pub use cache::KeyCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_TTL_ENV, SWEEP_INTERVAL_ENV, SWEEP_JITTER_ENV};
pub use dynamic::{AnyCache, AnyCacheExt, AnyValue};
pub use error::CacheError;
#[cfg(feature = "json")]
pub use json::JsonCache;
