//! The pending second-factor challenge: verification, resend, cooldown.

use agora_core::ClientError;
use agora_models::{LoginRequest, OtpCode, OtpSessionId, VerifyLoginOtpRequest};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::AuthApi;
use crate::credentials::UNEXPECTED_RESPONSE_MESSAGE;
use crate::establish::SessionGrant;

/// Seconds a user waits between resend requests.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// A login waiting for its one-time code.
///
/// `generation` identifies this challenge within a flow; a response tagged
/// with an older generation belongs to a challenge the user has moved on
/// from and is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub session_id: OtpSessionId,
    /// Where the code was sent, as the server chose to show it (usually masked).
    pub email: String,
    pub generation: u64,
}

/// A fresh challenge obtained by re-submitting the login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReissuedChallenge {
    pub session_id: OtpSessionId,
    pub email: String,
}

/// Network side of the OTP step.
///
/// Holds no state of its own; the flow owns the challenge and decides
/// whether a response still applies to it.
#[derive(Clone)]
pub struct OtpSessionHolder {
    api: Arc<dyn AuthApi>,
}

impl OtpSessionHolder {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Exchanges the challenge and code for a session.
    pub async fn verify(
        &self,
        session_id: &OtpSessionId,
        code: OtpCode,
    ) -> Result<SessionGrant, ClientError> {
        let request = VerifyLoginOtpRequest {
            session_id: session_id.clone(),
            code,
        };
        let data = self.api.verify_login_otp(&request).await?;
        match data.into_session() {
            Some(session) => Ok(SessionGrant::from_otp(session)),
            None => {
                warn!(session_id = %session_id, "Verification response without tokens");
                Err(ClientError::protocol(UNEXPECTED_RESPONSE_MESSAGE))
            }
        }
    }

    /// Re-submits the retained login to get a new code sent.
    ///
    /// `request` must be the attempt that produced the current challenge.
    pub async fn resend(&self, request: &LoginRequest) -> Result<ReissuedChallenge, ClientError> {
        let data = self.api.login(request).await?;
        let Some(session_id) = data.session_id else {
            warn!("Resend response without a session ID");
            return Err(ClientError::protocol(UNEXPECTED_RESPONSE_MESSAGE));
        };
        info!("New login code requested");
        Ok(ReissuedChallenge {
            session_id: OtpSessionId::from(session_id),
            email: data
                .email
                .unwrap_or_else(|| request.email_or_public_id.clone()),
        })
    }
}

/// Countdown until resend is allowed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::started()
    }
}

impl Cooldown {
    /// A full cooldown.
    pub fn started() -> Self {
        Self {
            remaining: RESEND_COOLDOWN_SECS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// One second elapsed. Returns the remaining seconds.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn reset(&mut self) {
        *self = Self::started();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_counts_down_to_zero() {
        let mut cooldown = Cooldown::started();
        assert_eq!(cooldown.remaining(), 60);
        assert!(!cooldown.is_ready());

        for _ in 0..59 {
            cooldown.tick();
        }
        assert_eq!(cooldown.remaining(), 1);
        assert_eq!(cooldown.tick(), 0);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.tick(), 0);
    }

    #[test]
    fn test_cooldown_reset() {
        let mut cooldown = Cooldown::started();
        cooldown.tick();
        cooldown.tick();
        cooldown.reset();
        assert_eq!(cooldown.remaining(), RESEND_COOLDOWN_SECS);
    }
}
