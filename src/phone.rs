//! Indian mobile number normalization.
//!
//! Every OTP and rate-limit key is derived from the canonical 10-digit form,
//! so `+91 98765-43210`, `09876543210` and `9876543210` all share one record.

use crate::errors::OtpError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Ten digits, the first one 6-9.
static INDIAN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());

/// A phone number that passed [`normalize_phone`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPhone(String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form, e.g. `98******10`.
    pub fn masked(&self) -> String {
        mask_phone(&self.0)
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips formatting and the `91` / `0` prefixes, then checks the result is a
/// valid 10-digit mobile number. Pure: no I/O happens here.
pub fn normalize_phone(phone: &str) -> Result<NormalizedPhone, OtpError> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = if digits.starts_with("91") && digits.len() > 10 {
        &digits[2..]
    } else if digits.starts_with('0') && digits.len() > 10 {
        &digits[1..]
    } else {
        digits.as_str()
    };

    if !INDIAN_MOBILE_REGEX.is_match(local) {
        return Err(OtpError::InvalidPhoneFormat);
    }

    Ok(NormalizedPhone(local.to_string()))
}

/// Keeps the first and last two characters.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < 2 || i >= len - 2 { c } else { '*' })
        .collect()
}
