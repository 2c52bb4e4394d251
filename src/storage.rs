use crate::config::{OtpConfig, StorageType};
use crate::errors::OtpError;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;

/// Shared key-value store holding every OTP and rate-limit counter.
///
/// Each operation is atomic per key. Nothing is cached in-process, so any
/// number of service instances can share one store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Atomically adds one and returns the new value. A missing key starts at 0.
    async fn increment(&self, key: &str) -> Result<u64, OtpError>;
    /// Arms a TTL on an existing key. Missing keys are left alone.
    async fn expire(&self, key: &str, seconds: u64) -> Result<(), OtpError>;
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), OtpError>;
    async fn get(&self, key: &str) -> Result<Option<String>, OtpError>;
    /// Returns whether a live key was removed.
    async fn delete(&self, key: &str) -> Result<bool, OtpError>;
}

pub mod redis;
pub use self::memory::InMemoryStorage;
pub use self::redis::RedisStorage;

pub fn from_config(config: &OtpConfig) -> Result<Arc<dyn Storage>, OtpError> {
    let storage: Arc<dyn Storage> = match config.storage_type {
        StorageType::Memory => Arc::new(InMemoryStorage::new()),
        StorageType::Redis => Arc::new(RedisStorage::new(&config.redis_url)?),
    };
    Ok(storage)
}
