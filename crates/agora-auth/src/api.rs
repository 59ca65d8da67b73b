//! The Agora authentication endpoints.
//!
//! [`AuthApi`] is the port the login flow talks to; [`HttpAuthApi`] is the
//! `reqwest` adapter used in production.

use agora_config::ApiConfig;
use agora_core::{ApiResponse, ClientError};
use agora_models::{LoginData, LoginRequest, VerifyLoginOtpRequest};
use agora_observability::tracing_utils::{record_error, record_http_status};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

pub const LOGIN_PATH: &str = "/auth/login";
pub const VERIFY_LOGIN_OTP_PATH: &str = "/auth/verify-login-otp";

/// Shown when a 2xx response does not carry a success envelope with data.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server. Please try again.";

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ClientError>;

    /// `POST /auth/verify-login-otp`
    async fn verify_login_otp(
        &self,
        request: &VerifyLoginOtpRequest,
    ) -> Result<LoginData, ClientError>;
}

/// HTTP adapter for [`AuthApi`].
///
/// The underlying client keeps a cookie store so that any session cookie the
/// server sets during login is sent back on verification.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpAuthApi {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[instrument(
        name = "http.client",
        skip(self, body),
        fields(
            service.name = "agora-api",
            http.method = "POST",
            http.url = %path,
            http.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    )]
    async fn post<B>(&self, path: &str, body: &B) -> Result<LoginData, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        record_http_status(status.as_u16());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.error_message());
            if let Some(message) = &message {
                record_error(message);
            }
            return Err(ClientError::request(status.as_u16(), message));
        }

        let envelope: ApiResponse<LoginData> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Undecodable success response");
                record_error(INVALID_RESPONSE_MESSAGE);
                return Err(ClientError::protocol(INVALID_RESPONSE_MESSAGE));
            }
        };

        envelope.into_success_data().ok_or_else(|| {
            warn!("Success response without success flag or data");
            record_error(INVALID_RESPONSE_MESSAGE);
            ClientError::protocol(INVALID_RESPONSE_MESSAGE)
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ClientError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn verify_login_otp(
        &self,
        request: &VerifyLoginOtpRequest,
    ) -> Result<LoginData, ClientError> {
        self.post(VERIFY_LOGIN_OTP_PATH, request).await
    }
}
