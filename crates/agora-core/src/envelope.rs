//! The response envelope wrapped around every API payload.
//!
//! ```text
//! { "success": true, "message": "...", "data": { ... }, "error": "..." | ["...", "..."] }
//! ```

use serde::Deserialize;

use crate::serde::deserialize_optional_string;

/// Generic API response envelope.
///
/// Unknown fields (such as the server's `timestamp`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

/// The `error` field of the envelope: a single string or a list of strings.
///
/// Any other JSON shape is kept verbatim so that an odd error payload never
/// makes the whole envelope unreadable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Single(String),
    Many(Vec<String>),
    Other(serde_json::Value),
}

impl ErrorDetail {
    fn as_message(&self) -> Option<String> {
        match self {
            Self::Single(s) if !s.trim().is_empty() => Some(s.clone()),
            Self::Many(items) => {
                let joined = items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        }
    }
}

impl<T> ApiResponse<T> {
    /// Human-readable error extracted from the envelope.
    ///
    /// Priority: `message`, then `error` as a string, then `error` as a list
    /// joined with `", "`. Returns `None` when none of them carries text.
    pub fn error_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.as_ref().and_then(ErrorDetail::as_message))
    }

    /// The payload of a successful envelope, or `None` when `success` is false
    /// or `data` is missing.
    pub fn into_success_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(json: &str) -> ApiResponse<Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_message_takes_priority() {
        let env = parse(r#"{"success":false,"message":"Invalid credentials","error":"Unauthorized"}"#);
        assert_eq!(env.error_message().as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_error_string_used_without_message() {
        let env = parse(r#"{"success":false,"error":"Account locked"}"#);
        assert_eq!(env.error_message().as_deref(), Some("Account locked"));
    }

    #[test]
    fn test_error_array_is_joined() {
        let env = parse(
            r#"{"success":false,"error":["password must be longer","emailOrPublicId should not be empty"]}"#,
        );
        assert_eq!(
            env.error_message().as_deref(),
            Some("password must be longer, emailOrPublicId should not be empty")
        );
    }

    #[test]
    fn test_empty_message_falls_through() {
        let env = parse(r#"{"success":false,"message":"","error":"Too many attempts"}"#);
        assert_eq!(env.error_message().as_deref(), Some("Too many attempts"));
    }

    #[test]
    fn test_no_error_text() {
        let env = parse(r#"{"success":false,"error":[]}"#);
        assert_eq!(env.error_message(), None);

        let env = parse(r#"{"success":false,"error":{"code":42}}"#);
        assert_eq!(env.error_message(), None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let env = parse(r#"{"success":true,"data":{"x":1},"timestamp":"2025-01-01T00:00:00Z"}"#);
        assert!(env.success);
        assert_eq!(env.into_success_data().unwrap()["x"], 1);
    }

    #[test]
    fn test_unsuccessful_envelope_has_no_data() {
        let env = parse(r#"{"success":false,"data":{"x":1}}"#);
        assert!(env.into_success_data().is_none());
    }
}
