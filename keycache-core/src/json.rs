// JSON extension methods (only available with "json" feature)

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::cache::KeyCache;
use crate::error::CacheError;

/// A cache of JSON documents
pub type JsonCache = KeyCache<String>;

impl KeyCache<String> {
    /// Store a JSON-serializable value in the cache with the default TTL.
    ///
    /// # Example
    /// ```rust
    /// # use keycache_core::{CacheConfig, JsonCache};
    /// # use serde::{Serialize, Deserialize};
    /// # use std::time::Duration;
    /// #[derive(Serialize, Deserialize, Debug, PartialEq)]
    /// struct User { name: String, age: u32 }
    ///
    /// # let cache = JsonCache::try_with_config(CacheConfig::default().with_sweep_interval(Duration::ZERO)).unwrap();
    /// let user = User { name: "Alice".into(), age: 30 };
    /// cache.set_json("user:1", &user)?;
    ///
    /// let retrieved: Option<User> = cache.get_json("user:1")?;
    /// assert_eq!(retrieved, Some(user));
    /// # Ok::<(), keycache_core::CacheError>(())
    /// ```
    pub fn set_json<V: Serialize>(&self, key: impl Into<String>, value: &V) -> Result<(), CacheError> {
        let json = serde_json::to_string(value).map_err(CacheError::Serialization)?;
        self.set(key, json);
        Ok(())
    }

    /// Store a JSON-serializable value that expires `ttl` from now.
    pub fn set_json_with_expiry<V: Serialize>(
        &self,
        key: impl Into<String>,
        value: &V,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(value).map_err(CacheError::Serialization)?;
        self.set_with_expiry(key, json, ttl);
        Ok(())
    }

    /// Retrieve and deserialize a JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    pub fn get_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, CacheError> {
        match self.get(key) {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(CacheError::Deserialization),
            None => Ok(None),
        }
    }
}
