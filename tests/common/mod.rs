use async_trait::async_trait;
use phone_otp_auth::{InMemoryStorage, OtpError, OtpPurpose, OtpStore, SmsSender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct TestSmsSender {
    pub sent: Arc<Mutex<Vec<(String, String, OtpPurpose)>>>,
    pub fail: AtomicBool,
}

impl TestSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        sent.last().expect("no SMS sent").1.clone()
    }

    #[allow(dead_code)]
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SmsSender for TestSmsSender {
    async fn send_otp(
        &self,
        phone: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), OtpError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string(), purpose));
        if self.fail.load(Ordering::SeqCst) {
            return Err(OtpError::Sms("provider unavailable".to_string()));
        }
        Ok(())
    }
}

#[allow(dead_code)]
pub fn spawn_store() -> (OtpStore, Arc<TestSmsSender>, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let sms_sender = Arc::new(TestSmsSender::new());
    let store = OtpStore::new(storage.clone(), sms_sender.clone());
    (store, sms_sender, storage)
}
