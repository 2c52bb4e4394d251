use crate::errors::OtpError;
use crate::storage::Storage;
use async_trait::async_trait;
use redis::AsyncCommands;

pub struct RedisStorage {
    client: redis::Client,
}

impl RedisStorage {
    pub fn new(redis_url: &str) -> Result<Self, OtpError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn increment(&self, key: &str) -> Result<u64, OtpError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let count: u64 = conn.incr(key, 1).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), OtpError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.expire::<_, ()>(key, seconds as i64).await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), OtpError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, OtpError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool, OtpError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let removed: u32 = conn.del(key).await?;
        Ok(removed > 0)
    }
}
