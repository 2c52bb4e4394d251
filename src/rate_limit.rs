use crate::errors::OtpError;
use crate::phone::mask_phone;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::warn;

const RATE_KEY_PREFIX: &str = "rate:";

/// Fixed-window counter kept in the shared store.
pub struct RateLimiter {
    storage: Arc<dyn Storage>,
}

impl RateLimiter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Counts this call against `key` and reports whether it fits in the quota.
    ///
    /// The increment always happens first, so concurrent callers past the
    /// ceiling are rejected. The window starts at the first increment and is
    /// not extended by later ones. A denial is `Ok(false)`, not an error.
    pub async fn is_allowed(
        &self,
        key: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> Result<bool, OtpError> {
        let rate_key = format!("{}{}", RATE_KEY_PREFIX, key);
        let count = self.storage.increment(&rate_key).await?;
        if count == 1 {
            self.storage.expire(&rate_key, window_seconds).await?;
        }

        let allowed = count <= max_requests;
        if !allowed {
            warn!(
                key = %mask_phone(key),
                count,
                max_requests,
                "Rate limit exceeded"
            );
        }
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, MockStorage};
    use mockall::predicate::*;
    use tokio::time::Duration;

    #[tokio::test]
    async fn test_first_increment_arms_ttl() {
        let mut mock_storage = MockStorage::new();

        mock_storage
            .expect_increment()
            .with(eq("rate:otp:9876543210"))
            .times(1)
            .returning(|_| Ok(1));

        mock_storage
            .expect_expire()
            .with(eq("rate:otp:9876543210"), eq(3600))
            .times(1)
            .returning(|_, _| Ok(()));

        let limiter = RateLimiter::new(Arc::new(mock_storage));
        assert!(limiter.is_allowed("otp:9876543210", 5, 3600).await.unwrap());
    }

    #[tokio::test]
    async fn test_later_increments_do_not_extend_window() {
        let mut mock_storage = MockStorage::new();

        mock_storage.expect_increment().returning(|_| Ok(3));
        mock_storage.expect_expire().never();

        let limiter = RateLimiter::new(Arc::new(mock_storage));
        assert!(limiter.is_allowed("otp:9876543210", 5, 3600).await.unwrap());
    }

    #[tokio::test]
    async fn test_over_ceiling_denied() {
        let mut mock_storage = MockStorage::new();

        mock_storage.expect_increment().returning(|_| Ok(6));

        let limiter = RateLimiter::new(Arc::new(mock_storage));
        assert!(!limiter.is_allowed("otp:9876543210", 5, 3600).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock_storage = MockStorage::new();

        mock_storage
            .expect_increment()
            .returning(|_| Err(OtpError::Storage("connection refused".into())));

        let limiter = RateLimiter::new(Arc::new(mock_storage));
        let result = limiter.is_allowed("otp:9876543210", 5, 3600).await;
        assert!(matches!(result, Err(OtpError::Storage(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::new(Arc::new(InMemoryStorage::new()));

        for _ in 0..3 {
            assert!(limiter.is_allowed("login:6000000000", 3, 60).await.unwrap());
        }
        assert!(!limiter.is_allowed("login:6000000000", 3, 60).await.unwrap());

        // Other keys have their own quota
        assert!(limiter.is_allowed("login:7000000000", 3, 60).await.unwrap());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.is_allowed("login:6000000000", 3, 60).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_callers_never_exceed_ceiling() {
        let limiter = Arc::new(RateLimiter::new(Arc::new(InMemoryStorage::new())));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.is_allowed("otp:9876543210", 5, 3600).await.unwrap()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }
}
