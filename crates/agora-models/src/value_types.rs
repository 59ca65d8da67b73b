//! Validated value types for login input.
//!
//! Holding one of these proves the value already passed validation, so the
//! flow never has to re-check it before building a request.
//!
//! # Example
//!
//! ```ignore
//! use agora_models::value_types::{Identifier, OtpCode};
//!
//! let id: Identifier = "AG-SCHL-A3B5C7".parse().unwrap();
//! assert!(id.is_public_id());
//!
//! let code: OtpCode = "482913".parse().unwrap();
//! assert_eq!(code.as_str(), "482913");
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use validator::{ValidateEmail, ValidationError};

/// Number of digits in a login OTP.
pub const OTP_LENGTH: usize = 6;

/// Public institutional IDs look like `AG-SCHL-A3B5C7`.
static PUBLIC_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[A-Z]{2,}(?:-[A-Z0-9]+)+$").expect("public id pattern is valid")
});

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    /// Neither an email address nor a public institutional ID.
    InvalidIdentifier(String),
    /// Not exactly six ASCII digits.
    InvalidOtpCode(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(msg) => write!(f, "Invalid identifier: {}", msg),
            Self::InvalidOtpCode(msg) => write!(f, "Invalid OTP code: {}", msg),
        }
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// What the user signs in with: an email address or a public institutional ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Email(String),
    PublicId(String),
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(s) | Self::PublicId(s) => s,
        }
    }

    pub fn is_public_id(&self) -> bool {
        matches!(self, Self::PublicId(_))
    }
}

impl FromStr for Identifier {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValueTypeError::InvalidIdentifier(
                "identifier cannot be empty".to_string(),
            ));
        }
        if trimmed.contains('@') {
            if trimmed.validate_email() {
                return Ok(Self::Email(trimmed.to_owned()));
            }
            return Err(ValueTypeError::InvalidIdentifier(format!(
                "'{}' is not a valid email address",
                trimmed
            )));
        }
        if PUBLIC_ID_RE.is_match(trimmed) {
            return Ok(Self::PublicId(trimmed.to_owned()));
        }
        Err(ValueTypeError::InvalidIdentifier(format!(
            "'{}' is neither an email nor a public ID",
            trimmed
        )))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `validator` custom rule for the `emailOrPublicId` field.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    value.parse::<Identifier>().map(|_| ()).map_err(|_| {
        ValidationError::new("identifier")
            .with_message("Enter a valid email address or public ID".into())
    })
}

// ============================================================================
// OtpCode
// ============================================================================

/// A complete six-digit login code.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a code from exactly six digits.
    pub fn from_digits(digits: [char; OTP_LENGTH]) -> Result<Self, ValueTypeError> {
        digits.iter().collect::<String>().parse()
    }
}

impl FromStr for OtpCode {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == OTP_LENGTH && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ValueTypeError::InvalidOtpCode(format!(
                "expected {} digits",
                OTP_LENGTH
            )))
        }
    }
}

// Codes are short-lived secrets; keep them out of logs.
impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_identifier() {
        let id: Identifier = "superadmin@agora.com".parse().unwrap();
        assert_eq!(id, Identifier::Email("superadmin@agora.com".to_string()));
        assert!(!id.is_public_id());
    }

    #[test]
    fn test_public_id_identifier() {
        let id: Identifier = "AG-SCHL-A3B5C7".parse().unwrap();
        assert!(id.is_public_id());
        assert_eq!(id.as_str(), "AG-SCHL-A3B5C7");

        let id: Identifier = " ag-tchr-9k2 ".parse().unwrap();
        assert_eq!(id.as_str(), "ag-tchr-9k2");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!("".parse::<Identifier>().is_err());
        assert!("   ".parse::<Identifier>().is_err());
        assert!("not-an-email@".parse::<Identifier>().is_err());
        assert!("john".parse::<Identifier>().is_err());
        assert!("AG".parse::<Identifier>().is_err());
        assert!("AG-".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_validate_identifier_message() {
        let err = validate_identifier("john").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("Enter a valid email address or public ID")
        );
        assert!(validate_identifier("teacher@school.edu").is_ok());
    }

    #[test]
    fn test_otp_code_parsing() {
        assert!("482913".parse::<OtpCode>().is_ok());
        assert!("48291".parse::<OtpCode>().is_err());
        assert!("4829130".parse::<OtpCode>().is_err());
        assert!("48291a".parse::<OtpCode>().is_err());
        assert!("٤٨٢٩١٣".parse::<OtpCode>().is_err());
    }

    #[test]
    fn test_otp_code_from_digits() {
        let code = OtpCode::from_digits(['1', '2', '3', '4', '5', '6']).unwrap();
        assert_eq!(code.as_str(), "123456");
        assert!(OtpCode::from_digits(['1', '2', '3', '4', '5', 'x']).is_err());
    }

    #[test]
    fn test_otp_code_debug_is_masked() {
        let code: OtpCode = "482913".parse().unwrap();
        assert!(!format!("{:?}", code).contains("482913"));
    }
}
