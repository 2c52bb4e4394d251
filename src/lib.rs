#![doc = include_str!("../README.md")]

pub mod config;
pub mod cron;
pub mod errors;
pub mod otp_store;
pub mod phone;
pub mod purpose;
pub mod rate_limit;
pub mod sms;
pub mod storage;

pub use config::{OtpConfig, SmsProvider, StorageType};
pub use errors::OtpError;
pub use otp_store::OtpStore;
pub use phone::{normalize_phone, NormalizedPhone};
pub use purpose::OtpPurpose;
pub use rate_limit::RateLimiter;
pub use sms::{Fast2SmsSender, LogSmsSender, SmsSender};
pub use storage::{InMemoryStorage, RedisStorage, Storage};
