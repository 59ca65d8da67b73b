//! Authentication DTOs.
//!
//! Request bodies sent to `/auth/login` and `/auth/verify-login-otp`, the
//! `data` payload both endpoints answer with, and the session the client
//! keeps once a login completes.

use agora_core::serde::{deserialize_optional_id_string, deserialize_optional_string};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

use crate::ids::{OtpSessionId, SchoolId, UserId};
use crate::roles::Role;
use crate::value_types::{OtpCode, validate_identifier};

/// Login request with an email or public ID and a password.
///
/// If the account requires a second factor, the server answers with a
/// session identifier instead of tokens (see [`LoginData::requires_otp`]).
#[derive(Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "validate_identifier"))]
    pub email_or_public_id: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email_or_public_id", &self.email_or_public_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// OTP verification request.
///
/// Both fields are validated by construction: the session ID came from the
/// server and [`OtpCode`] only holds six digits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLoginOtpRequest {
    pub session_id: OtpSessionId,
    pub code: OtpCode,
}

/// The `data` payload of a successful `/auth/login` or
/// `/auth/verify-login-otp` response.
///
/// Every field is optional on the wire; which ones are present decides the
/// next step of the login flow.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub requires_otp: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl LoginData {
    /// True when the server asks for a second factor and named the challenge.
    pub fn requires_otp(&self) -> bool {
        self.requires_otp.unwrap_or(false) && self.session_id.is_some()
    }

    /// Whether the payload carries a complete set of credentials.
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    /// Converts the payload into a session when it carries an access token
    /// and a user.
    pub fn into_session(self) -> Option<AuthenticatedSession> {
        Some(AuthenticatedSession {
            access_token: self.access_token?,
            refresh_token: self.refresh_token,
            user: self.user?,
        })
    }
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("requires_otp", &self.requires_otp)
            .field("session_id", &self.session_id)
            .field("email", &self.email)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

/// The authenticated user as returned by the API.
///
/// Only the fields the client acts on are typed; the rest of the profile
/// (`firstName`, `profileImage`, ...) is kept in `profile`. A null or missing
/// role decodes as an unnamed [`Role::Other`]; IDs may be strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Role,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub school_id: Option<SchoolId>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(deserialize_optional_id_string(deserializer)?.map(T::from))
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(Role::from)
        .unwrap_or_default())
}

/// Credentials held for the lifetime of a login.
///
/// Superseded wholesale on the next login; cleared on logout or expiry.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}
