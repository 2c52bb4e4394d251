use thiserror::Error;

#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid Indian mobile number format")]
    InvalidPhoneFormat,

    #[error("Unknown OTP purpose: {0}")]
    InvalidPurpose(String),

    #[error("Too many OTP requests, try again in {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("SMS error: {0}")]
    Sms(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl OtpError {
    /// Errors the end user can fix by changing input or waiting.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            OtpError::InvalidPhoneFormat
                | OtpError::InvalidPurpose(_)
                | OtpError::RateLimitExceeded { .. }
        )
    }
}
