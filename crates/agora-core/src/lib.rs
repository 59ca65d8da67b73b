//! # Agora Core
//!
//! Core types shared by every Agora client crate:
//!
//! - [`errors`]: the client error type and its user-facing rendering
//! - [`envelope`]: the `{ success, message, data, error }` response envelope
//! - [`serde`]: custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use agora_core::{ApiResponse, ClientError};
//!
//! let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(body)?;
//! if let Some(message) = envelope.error_message() {
//!     return Err(ClientError::request(401, Some(message)));
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use envelope::{ApiResponse, ErrorDetail};
pub use errors::ClientError;
