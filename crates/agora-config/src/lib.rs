//! # Agora Config
//!
//! Configuration types for the Agora client, loaded from environment variables:
//!
//! - [`api`]: API base URL and request timeout
//! - [`login`]: Login flow policy
//! - [`storage`]: Location of durable client state
//!
//! # Example
//!
//! ```ignore
//! use agora_config::{ApiConfig, LoginConfig, StorageConfig};
//!
//! // Load all configs from environment
//! let api_config = ApiConfig::from_env();
//! let login_config = LoginConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod api;
pub mod login;
pub mod storage;

// Re-export commonly used types at crate root
pub use api::ApiConfig;
pub use login::LoginConfig;
pub use storage::StorageConfig;

/// Parses a boolean flag the way the rest of the configuration does:
/// `true`/`1` (any case) is on, everything else is off.
pub(crate) fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
