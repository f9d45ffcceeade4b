//! Error types for the cache.
//!
//! Cache operations themselves never fail: a missing or expired key is simply
//! `None`. The variants here cover construction, configuration loading and the
//! optional JSON helpers.

use thiserror::Error;

/// Errors that can occur when building or configuring a cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No Tokio runtime was available to host the background sweep task
    #[error(
        "no Tokio runtime available; create the cache from within a runtime \
         (e.g. #[tokio::main] or #[tokio::test]) or disable the sweep with a zero interval"
    )]
    NoRuntime,

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error (requires `json` feature)
    #[cfg(feature = "json")]
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization error (requires `json` feature)
    #[cfg(feature = "json")]
    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig("KEYCACHE_SWEEP_INTERVAL_SECS=abc".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: KEYCACHE_SWEEP_INTERVAL_SECS=abc"
        );
    }

    #[test]
    fn test_no_runtime_message_mentions_zero_interval() {
        let message = CacheError::NoRuntime.to_string();
        assert!(message.starts_with("no Tokio runtime available"));
        assert!(message.contains("zero interval"));
    }
}
