use crate::errors::OtpError;
use crate::storage::InMemoryStorage;
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{debug, error, info, instrument};

/// Sweeps expired OTPs and counters out of [`InMemoryStorage`].
///
/// Redis expires keys on its own, so this is only needed for the memory
/// backend, where expired entries otherwise linger until their key is touched.
pub struct CleanupService {
    storage: Arc<InMemoryStorage>,
}

impl CleanupService {
    pub fn new(storage: Arc<InMemoryStorage>) -> Self {
        Self { storage }
    }

    #[instrument(skip(self))]
    pub async fn run_cleanup(&self) -> Result<usize, OtpError> {
        let removed = self.storage.purge_expired()?;
        debug!(removed, "Expired entries purged");
        Ok(removed)
    }

    /// Runs [`CleanupService::run_cleanup`] every `interval`, forever.
    pub async fn start_scheduler(self: Arc<Self>, interval: Duration) {
        let mut timer = time::interval(interval);

        info!("Cleanup scheduler started with interval: {:?}", interval);

        loop {
            timer.tick().await;

            if let Err(e) = self.run_cleanup().await {
                error!("Cleanup job failed: {:?}", e);
            }
        }
    }
}
