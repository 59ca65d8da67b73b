use thiserror::Error;
use validator::ValidationErrors;

/// Errors produced while talking to the Agora API or managing client state.
///
/// These never escape the login flow; they are rendered into a single
/// user-facing message with [`ClientError::user_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client-side validation failed; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The server answered with a non-success status.
    ///
    /// `message` is whatever text the envelope carried, if any.
    #[error("request failed with status {status}")]
    Request {
        status: u16,
        message: Option<String>,
    },

    /// The request never completed (connection refused, timeout, bad body).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success envelope that does not have the expected shape.
    #[error("{0}")]
    Protocol(String),

    /// Reading or writing persisted client state failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn request(status: u16, message: Option<String>) -> Self {
        Self::Request { status, message }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        Self::Storage(err.to_string())
    }

    /// Message to show the user, falling back to `fallback` for errors whose
    /// text is not meant for end users.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Request { message, .. } => message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
            Self::Protocol(message) => message.clone(),
            Self::Validation(errors) => first_validation_message(errors)
                .unwrap_or_else(|| fallback.to_string()),
            Self::Transport(_) | Self::Storage(_) => fallback.to_string(),
        }
    }
}

fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(field, errs)| {
        errs.first().map(|e| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid {field}"),
        })
    })
}
