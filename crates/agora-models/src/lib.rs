//! # Agora Models
//!
//! Wire DTOs and domain types used by the Agora login client.
//!
//! # Modules
//!
//! - [`auth`]: Login and OTP verification requests, response payloads, sessions
//! - [`ids`]: Strongly-typed string identifiers
//! - [`roles`]: System roles, dashboard routing, principal roles
//! - [`value_types`]: Validated identifiers and OTP codes
//!
//! # Example
//!
//! ```ignore
//! use agora_models::auth::LoginRequest;
//! use validator::Validate;
//!
//! let request = LoginRequest {
//!     email_or_public_id: "superadmin@agora.com".into(),
//!     password: "password123".into(),
//! };
//! request.validate()?;
//! ```

pub mod auth;
pub mod ids;
pub mod roles;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use auth::{AuthUser, AuthenticatedSession, LoginData, LoginRequest, VerifyLoginOtpRequest};
pub use ids::{OtpSessionId, SchoolId, UserId};
pub use roles::{Role, is_principal_role};
pub use value_types::{Identifier, OTP_LENGTH, OtpCode, ValueTypeError};
