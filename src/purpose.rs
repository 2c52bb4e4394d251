use crate::errors::OtpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a code was requested. Used for logging and SMS copy only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    Registration,
    PasswordReset,
    PhoneChange,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "REGISTRATION",
            OtpPurpose::PasswordReset => "PASSWORD_RESET",
            OtpPurpose::PhoneChange => "PHONE_CHANGE",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "REGISTRATION" => Ok(OtpPurpose::Registration),
            "PASSWORD_RESET" => Ok(OtpPurpose::PasswordReset),
            "PHONE_CHANGE" => Ok(OtpPurpose::PhoneChange),
            _ => Err(OtpError::InvalidPurpose(s.to_string())),
        }
    }
}
