use crate::errors::OtpError;

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub storage_type: StorageType,
    pub redis_url: String,
    pub sms_provider: SmsProvider,
    pub fast2sms_api_key: String,
    pub fast2sms_url: String,
    pub sms_timeout_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageType {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmsProvider {
    /// Logs instead of sending. Development only.
    Log,
    Fast2Sms,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Redis,
            redis_url: "redis://127.0.0.1/".to_string(),
            sms_provider: SmsProvider::Log,
            fast2sms_api_key: "".to_string(),
            fast2sms_url: "https://www.fast2sms.com/dev/bulkV2".to_string(),
            sms_timeout_seconds: 10,
            cleanup_interval_seconds: 60,
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Result<Self, OtpError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("STORAGE_TYPE") {
            config.storage_type = match val.to_lowercase().as_str() {
                "memory" => StorageType::Memory,
                "redis" => StorageType::Redis,
                _ => {
                    return Err(OtpError::Config(
                        "Invalid STORAGE_TYPE: must be 'memory' or 'redis'".to_string(),
                    ))
                }
            };
        }

        if let Ok(url) = std::env::var("REDIS_URL") {
            config.redis_url = url;
        } else if config.storage_type == StorageType::Redis {
            let redis_host = std::env::var("REDIS_HOST")
                .map_err(|_| OtpError::Config("REDIS_HOST must be set".to_string()))?;
            let redis_port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
            config.redis_url = format!("redis://{}:{}/", redis_host, redis_port);
        }

        if let Ok(val) = std::env::var("SMS_PROVIDER") {
            config.sms_provider = match val.to_lowercase().as_str() {
                "log" => SmsProvider::Log,
                "fast2sms" => SmsProvider::Fast2Sms,
                _ => {
                    return Err(OtpError::Config(
                        "Invalid SMS_PROVIDER: must be 'log' or 'fast2sms'".to_string(),
                    ))
                }
            };
        }

        if config.sms_provider == SmsProvider::Fast2Sms {
            config.fast2sms_api_key = std::env::var("FAST2SMS_API_KEY")
                .map_err(|_| OtpError::Config("FAST2SMS_API_KEY must be set".to_string()))?;
        }
        if let Ok(val) = std::env::var("FAST2SMS_URL") {
            config.fast2sms_url = val;
        }
        if let Ok(val) = std::env::var("SMS_TIMEOUT_SECONDS") {
            config.sms_timeout_seconds = val
                .parse()
                .map_err(|_| OtpError::Config("Invalid SMS_TIMEOUT_SECONDS".to_string()))?;
        }
        if let Ok(val) = std::env::var("CLEANUP_INTERVAL_SECONDS") {
            config.cleanup_interval_seconds = val.parse().map_err(|_| {
                OtpError::Config("Invalid CLEANUP_INTERVAL_SECONDS".to_string())
            })?;
        }

        Ok(config)
    }

    pub fn cleanup_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cleanup_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.storage_type, StorageType::Redis);
        assert_eq!(config.sms_provider, SmsProvider::Log);
        assert_eq!(config.redis_url, "redis://127.0.0.1/");
        assert!(config.fast2sms_api_key.is_empty());
        assert_eq!(config.cleanup_interval().as_secs(), 60);
    }
}
