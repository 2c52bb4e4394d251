use crate::config::OtpConfig;
use crate::errors::OtpError;
use crate::phone::{normalize_phone, NormalizedPhone};
use crate::purpose::OtpPurpose;
use crate::rate_limit::RateLimiter;
use crate::sms::{self, SmsSender};
use crate::storage::{self, Storage};
use rand::rngs::OsRng;
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const OTP_KEY_PREFIX: &str = "otp:";
pub const OTP_LENGTH: usize = 6;
pub const OTP_EXPIRY_SECONDS: u64 = 300;
pub const MAX_OTP_PER_HOUR: u64 = 5;
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 3600;

/// Issues and verifies phone OTPs. Holds no state of its own; every record
/// lives in the shared [`Storage`].
pub struct OtpStore {
    storage: Arc<dyn Storage>,
    sms_sender: Arc<dyn SmsSender>,
    rate_limiter: RateLimiter,
}

impl OtpStore {
    pub fn new(storage: Arc<dyn Storage>, sms_sender: Arc<dyn SmsSender>) -> Self {
        let rate_limiter = RateLimiter::new(storage.clone());
        Self {
            storage,
            sms_sender,
            rate_limiter,
        }
    }

    pub fn from_config(config: &OtpConfig) -> Result<Self, OtpError> {
        let storage = storage::from_config(config)?;
        let sms_sender = sms::from_config(config)?;
        Ok(Self::new(storage, sms_sender))
    }

    /// Generates a code for `phone`, stores it for five minutes and hands it
    /// to the SMS sender.
    ///
    /// A new code replaces any earlier one. Delivery failures are logged and
    /// do not fail the call, since the stored code stays valid.
    #[instrument(skip(self, phone))]
    pub async fn send_otp(&self, phone: &str, purpose: OtpPurpose) -> Result<(), OtpError> {
        let phone = normalize_phone(phone)?;

        let rate_key = format!("{}{}", OTP_KEY_PREFIX, phone);
        if !self
            .rate_limiter
            .is_allowed(&rate_key, MAX_OTP_PER_HOUR, RATE_LIMIT_WINDOW_SECONDS)
            .await?
        {
            warn!(phone = %phone.masked(), "OTP issuance rate limit exceeded");
            return Err(OtpError::RateLimitExceeded {
                retry_after_seconds: RATE_LIMIT_WINDOW_SECONDS,
            });
        }

        let code = generate_otp();
        self.storage
            .set_ex(&otp_key(&phone), &code, OTP_EXPIRY_SECONDS)
            .await?;

        info!(phone = %phone.masked(), %purpose, "OTP generated and stored");

        if let Err(e) = self
            .sms_sender
            .send_otp(phone.as_str(), &code, purpose)
            .await
        {
            error!(phone = %phone.masked(), %purpose, error = %e, "Failed to deliver OTP");
        }

        Ok(())
    }

    /// Checks `code` against the live OTP for `phone` and consumes it on match.
    ///
    /// Returns `Ok(false)` for a wrong, expired or never-issued code. A wrong
    /// code leaves the stored one in place. `purpose` is only logged: a code
    /// issued for one purpose verifies any other.
    #[instrument(skip(self, phone, code))]
    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<bool, OtpError> {
        let phone = normalize_phone(phone)?;
        let key = otp_key(&phone);

        let stored = match self.storage.get(&key).await? {
            Some(stored) => stored,
            None => {
                warn!(phone = %phone.masked(), "OTP not found or expired");
                return Ok(false);
            }
        };

        if stored != code.trim() {
            warn!(phone = %phone.masked(), "Invalid OTP attempt");
            return Ok(false);
        }

        // Only the caller whose delete removed the key gets to consume it.
        if !self.storage.delete(&key).await? {
            warn!(phone = %phone.masked(), "OTP consumed concurrently");
            return Ok(false);
        }

        info!(phone = %phone.masked(), %purpose, "OTP verified");
        Ok(true)
    }
}

fn otp_key(phone: &NormalizedPhone) -> String {
    format!("{}{}", OTP_KEY_PREFIX, phone)
}

fn generate_otp() -> String {
    let range = 10u32.pow(OTP_LENGTH as u32);
    let num = OsRng.gen_range(0..range);
    format!("{:0width$}", num, width = OTP_LENGTH)
}
