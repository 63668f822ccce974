//! Subscriber phone numbers

use crate::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static PHONE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10,11}$").expect("phone number pattern is valid")
});

/// Area code plus subscriber number, 10 or 11 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(value: &str) -> AppResult<Self> {
        if PHONE_NUMBER_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::InvalidPhoneNumber(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        assert_eq!(PhoneNumber::parse("11123456789").unwrap().as_str(), "11123456789");
        assert_eq!(PhoneNumber::parse("1212345678").unwrap().as_str(), "1212345678");
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(PhoneNumber::parse("123456789").is_err()); // 9 digits
        assert!(PhoneNumber::parse("123456789123").is_err()); // 12 digits
        assert!(PhoneNumber::parse("+5511234567").is_err());
        assert!(PhoneNumber::parse("11 23456789").is_err());
        assert!(PhoneNumber::parse("").is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(PhoneNumber::parse("٩٩٩٨٨٥٢٦٤٢٣").is_err()); // Arabic-Indic
        assert!(PhoneNumber::parse("９９９８８５２６４２３").is_err()); // fullwidth
    }
}
