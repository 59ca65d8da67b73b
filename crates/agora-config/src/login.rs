use std::env;

use crate::parse_flag;

/// Login flow policy.
#[derive(Clone, Debug)]
pub struct LoginConfig {
    /// Accept a login response that carries tokens without an OTP step.
    ///
    /// The session is still established when enabled, but every such login
    /// is logged as a security event.
    pub allow_legacy_login: bool,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            allow_legacy_login: true,
        }
    }
}

impl LoginConfig {
    pub fn from_env() -> Self {
        Self {
            allow_legacy_login: env::var("AGORA_ALLOW_LEGACY_LOGIN")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}
