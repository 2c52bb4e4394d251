use crate::config::{OtpConfig, SmsProvider};
use crate::errors::OtpError;
use crate::phone::mask_phone;
use crate::purpose::OtpPurpose;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_otp(&self, phone: &str, code: &str, purpose: OtpPurpose)
        -> Result<(), OtpError>;
}

pub fn from_config(config: &OtpConfig) -> Result<Arc<dyn SmsSender>, OtpError> {
    let sender: Arc<dyn SmsSender> = match config.sms_provider {
        SmsProvider::Log => Arc::new(LogSmsSender),
        SmsProvider::Fast2Sms => Arc::new(Fast2SmsSender::new(config)?),
    };
    Ok(sender)
}

/// Fast2SMS OTP route.
pub struct Fast2SmsSender {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

#[derive(Deserialize)]
struct Fast2SmsResponse {
    #[serde(rename = "return")]
    ok: bool,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    message: serde_json::Value,
}

impl Fast2SmsSender {
    pub fn new(config: &OtpConfig) -> Result<Self, OtpError> {
        if config.fast2sms_api_key.is_empty() {
            return Err(OtpError::Config("Fast2SMS API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.sms_timeout_seconds))
            .build()
            .map_err(|e| OtpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.fast2sms_api_key.clone(),
            url: config.fast2sms_url.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for Fast2SmsSender {
    async fn send_otp(
        &self,
        phone: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), OtpError> {
        let response = self
            .client
            .post(&self.url)
            .header("authorization", &self.api_key)
            .header("Accept", "application/json")
            .form(&[
                ("route", "otp"),
                ("variables_values", code),
                ("numbers", phone),
                ("flash", "0"),
            ])
            .send()
            .await
            .map_err(|e| OtpError::Sms(format!("Fast2SMS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OtpError::Sms(format!(
                "Fast2SMS returned status {}",
                status
            )));
        }

        let body: Fast2SmsResponse = response
            .json()
            .await
            .map_err(|e| OtpError::Sms(format!("Invalid Fast2SMS response: {}", e)))?;

        if !body.ok {
            return Err(OtpError::Sms(format!(
                "Fast2SMS rejected message: {}",
                body.message
            )));
        }

        debug!(
            phone = %mask_phone(phone),
            %purpose,
            request_id = body.request_id.as_deref().unwrap_or("-"),
            "OTP SMS accepted by Fast2SMS"
        );
        Ok(())
    }
}

/// Logs the delivery instead of sending it. The code is not logged.
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_otp(
        &self,
        phone: &str,
        _code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), OtpError> {
        info!(phone = %mask_phone(phone), %purpose, "OTP SMS suppressed (log provider)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast2sms_requires_api_key() {
        let config = OtpConfig {
            sms_provider: SmsProvider::Fast2Sms,
            ..OtpConfig::default()
        };
        assert!(matches!(
            Fast2SmsSender::new(&config),
            Err(OtpError::Config(_))
        ));
        assert!(from_config(&config).is_err());
    }

    #[test]
    fn test_fast2sms_response_parsing() {
        let body: Fast2SmsResponse = serde_json::from_str(
            r#"{"return":true,"request_id":"lwdtp7cjyqxvfe9","message":["SMS sent successfully."]}"#,
        )
        .unwrap();
        assert!(body.ok);
        assert_eq!(body.request_id.as_deref(), Some("lwdtp7cjyqxvfe9"));

        let body: Fast2SmsResponse =
            serde_json::from_str(r#"{"return":false,"status_code":412,"message":"Invalid Authentication"}"#)
                .unwrap();
        assert!(!body.ok);
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let config = OtpConfig::default();
        let sender = from_config(&config).unwrap();
        sender
            .send_otp("9876543210", "123456", OtpPurpose::Registration)
            .await
            .unwrap();
    }
}
