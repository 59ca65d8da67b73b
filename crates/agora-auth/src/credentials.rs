//! First step of the login: identifier and password.

use agora_core::ClientError;
use agora_models::{AuthenticatedSession, LoginData, LoginRequest, OtpSessionId};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

use crate::api::AuthApi;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server. Please try again.";

/// How the server answered a valid login.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// A code was sent; the login continues with verification.
    OtpRequired {
        session_id: OtpSessionId,
        email: String,
    },
    /// Tokens came back without a second factor.
    LegacyBypass(AuthenticatedSession),
}

/// Validates credentials, sends them, and classifies the answer.
#[derive(Clone)]
pub struct CredentialSubmitter {
    api: Arc<dyn AuthApi>,
}

impl CredentialSubmitter {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Builds and validates the request body. Nothing is sent when this fails.
    pub fn build_request(
        identifier: &str,
        password: &SecretString,
    ) -> Result<LoginRequest, ClientError> {
        let request = LoginRequest {
            email_or_public_id: identifier.trim().to_string(),
            password: password.expose_secret().to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    pub async fn submit(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, ClientError> {
        let request = Self::build_request(identifier, password)?;
        let data = self.api.login(&request).await?;
        classify(data, &request.email_or_public_id)
    }
}

/// Decides what a successful login response means.
///
/// A challenge wins over tokens when both are present. `identifier` stands
/// in for the email when the server did not send one.
pub fn classify(data: LoginData, identifier: &str) -> Result<LoginOutcome, ClientError> {
    if data.requires_otp() {
        if let Some(session_id) = data.session_id {
            return Ok(LoginOutcome::OtpRequired {
                session_id: OtpSessionId::from(session_id),
                email: data.email.unwrap_or_else(|| identifier.to_string()),
            });
        }
    }

    match data.into_session() {
        Some(session) => Ok(LoginOutcome::LegacyBypass(session)),
        None => {
            warn!("Login response with neither a challenge nor tokens");
            Err(ClientError::protocol(UNEXPECTED_RESPONSE_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAuthApi;
    use agora_models::Role;

    fn data(json: &str) -> LoginData {
        serde_json::from_str(json).unwrap()
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_classify_otp_required() {
        let outcome = classify(
            data(r#"{"requiresOtp":true,"sessionId":"sess_abc123","email":"s***n@agora.com"}"#),
            "superadmin@agora.com",
        )
        .unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::OtpRequired {
                session_id: OtpSessionId::from("sess_abc123"),
                email: "s***n@agora.com".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_otp_falls_back_to_identifier() {
        let outcome = classify(
            data(r#"{"requiresOtp":true,"sessionId":"sess_1"}"#),
            "AG-SCHL-A3B5C7",
        )
        .unwrap();
        assert!(matches!(
            outcome,
            LoginOutcome::OtpRequired { email, .. } if email == "AG-SCHL-A3B5C7"
        ));
    }

    #[test]
    fn test_classify_challenge_wins_over_tokens() {
        let outcome = classify(
            data(r#"{"requiresOtp":true,"sessionId":"sess_1","accessToken":"tok","user":{"role":"TEACHER"}}"#),
            "t@agora.com",
        )
        .unwrap();
        assert!(matches!(outcome, LoginOutcome::OtpRequired { .. }));
    }

    #[test]
    fn test_classify_legacy_tokens() {
        let outcome = classify(
            data(r#"{"accessToken":"tok","user":{"role":"TEACHER"}}"#),
            "t@agora.com",
        )
        .unwrap();
        match outcome {
            LoginOutcome::LegacyBypass(session) => {
                assert_eq!(session.access_token, "tok");
                assert_eq!(session.user.role, Role::Teacher);
            }
            other => panic!("expected legacy bypass, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_anomaly() {
        let err = classify(data(r#"{"requiresOtp":true}"#), "t@agora.com").unwrap_err();
        assert_eq!(err.user_message(LOGIN_FAILED_MESSAGE), UNEXPECTED_RESPONSE_MESSAGE);

        let err = classify(data(r#"{"accessToken":"tok"}"#), "t@agora.com").unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_invalid_credentials_never_reach_the_api() {
        let api = Arc::new(ScriptedAuthApi::new());
        let submitter = CredentialSubmitter::new(api.clone());

        let err = submitter
            .submit("not-an-id", &secret("password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = submitter
            .submit("superadmin@agora.com", &secret("short"))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(LOGIN_FAILED_MESSAGE),
            "Password must be at least 8 characters"
        );
        assert_eq!(api.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_sends_trimmed_identifier() {
        let api = Arc::new(ScriptedAuthApi::new());
        api.push_login(Ok(data(r#"{"requiresOtp":true,"sessionId":"sess_1"}"#)));
        let submitter = CredentialSubmitter::new(api.clone());

        submitter
            .submit("  superadmin@agora.com ", &secret("password123"))
            .await
            .unwrap();
        let sent = api.last_login().unwrap();
        assert_eq!(sent.email_or_public_id, "superadmin@agora.com");
        assert_eq!(sent.password, "password123");
    }

    #[tokio::test]
    async fn test_submit_passes_request_errors_through() {
        let api = Arc::new(ScriptedAuthApi::new());
        api.push_login(Err(ClientError::request(
            401,
            Some("Invalid credentials".to_string()),
        )));
        let submitter = CredentialSubmitter::new(api);

        let err = submitter
            .submit("superadmin@agora.com", &secret("password123"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(LOGIN_FAILED_MESSAGE), "Invalid credentials");
    }
}
