use crate::errors::OtpError;
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::time::{Duration, Instant};

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| deadline > now)
    }
}

/// Single-process store with Redis-like TTL semantics.
///
/// Expired entries read as absent; [`InMemoryStorage::purge_expired`] frees
/// their memory.
pub struct InMemoryStorage {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, OtpError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, entry| entry.is_live(now));
        Ok(before - map.len())
    }

    pub fn len(&self) -> Result<usize, OtpError> {
        let map = self
            .entries
            .read()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, OtpError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn increment(&self, key: &str) -> Result<u64, OtpError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        let now = Instant::now();

        if map.get(key).is_some_and(|entry| !entry.is_live(now)) {
            map.remove(key);
        }

        let entry = map.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            expires_at: None,
        });

        let count: u64 = entry
            .value
            .parse()
            .map_err(|_| OtpError::Storage(format!("Value at {} is not an integer", key)))?;
        let count = count + 1;
        entry.value = count.to_string();

        Ok(count)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), OtpError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        let now = Instant::now();

        if let Some(entry) = map.get_mut(key) {
            if entry.is_live(now) {
                entry.expires_at = Some(now + Duration::from_secs(seconds));
            }
        }
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), OtpError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, OtpError> {
        let map = self
            .entries
            .read()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        if let Some(entry) = map.get(key) {
            if entry.is_live(Instant::now()) {
                return Ok(Some(entry.value.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool, OtpError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| OtpError::Storage("Lock poisoned".into()))?;
        let removed = map.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live(Instant::now())))
    }
}
