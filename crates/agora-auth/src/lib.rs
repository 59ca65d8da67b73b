//! # Agora Auth
//!
//! The OTP-gated login handshake of the Agora client.
//!
//! - [`api`]: the authentication endpoints ([`AuthApi`], [`HttpAuthApi`])
//! - [`credentials`]: identifier/password validation and response classification
//! - [`otp`]: the pending challenge, verification, resend and its cooldown
//! - [`code`]: six-slot code entry with paste and auto-submit
//! - [`establish`]: storing the session and choosing the dashboard
//! - [`store`]: session and durable key-value storage
//! - [`claims`]: client-side reading of access-token expiry
//! - [`flow`]: the [`LoginFlow`] state machine tying the steps together
//!
//! # Example
//!
//! ```ignore
//! use agora_auth::{FlowEvent, HttpAuthApi, InMemorySessionStore, LoginFlow, MemoryKeyValueStore};
//! use agora_config::{ApiConfig, LoginConfig};
//! use std::sync::Arc;
//!
//! let api = Arc::new(HttpAuthApi::new(ApiConfig::from_env())?);
//! let flow = LoginFlow::new(
//!     api,
//!     Arc::new(InMemorySessionStore::new()),
//!     Arc::new(MemoryKeyValueStore::new()),
//!     LoginConfig::from_env(),
//! );
//!
//! if let FlowEvent::OtpRequired { email } = flow
//!     .submit_credentials("superadmin@agora.com", "password123".to_string().into())
//!     .await
//! {
//!     println!("Code sent to {email}");
//!     let event = flow.paste("482913").await;
//! }
//! ```

pub mod api;
pub mod claims;
pub mod code;
pub mod credentials;
pub mod establish;
pub mod flow;
pub mod otp;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types at crate root
pub use api::{AuthApi, HttpAuthApi};
pub use claims::{AccessTokenClaims, is_expired, read_access_claims};
pub use code::{CodeCollector, CodeEvent};
pub use credentials::{CredentialSubmitter, LoginOutcome, classify};
pub use establish::{Established, LoginPath, SessionEstablisher, SessionGrant};
pub use flow::{AuthUiState, FlowEvent, FlowSnapshot, LoginFlow};
pub use otp::{Cooldown, OtpChallenge, OtpSessionHolder, RESEND_COOLDOWN_SECS, ReissuedChallenge};
pub use store::{
    CURRENT_SCHOOL_ID_KEY, FileKeyValueStore, InMemorySessionStore, KeyValueStore,
    MemoryKeyValueStore, SessionStore,
};
