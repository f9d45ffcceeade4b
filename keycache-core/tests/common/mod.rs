use std::time::Duration;

use keycache_core::CacheConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a fmt subscriber once per test binary; `RUST_LOG=keycache_core=debug`
/// shows sweep activity.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keycache_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Config with a fixed sweep period so tick timing is predictable
#[allow(dead_code)]
pub fn exact_config(ttl: Duration, sweep_interval: Duration) -> CacheConfig {
    CacheConfig::default()
        .with_default_ttl(ttl)
        .with_sweep_interval(sweep_interval)
        .with_jitter(false)
}
