//! Span and event helpers for the authentication flow.
//!
//! Spans are opened with `#[instrument]` at the call sites; these helpers
//! fill in the fields those spans declare as `Empty`. `security_event!` is
//! exported at the crate root.

use tracing::Span;

/// Log a security-relevant event at WARN level
///
/// Use this for events like a login that skipped the second factor.
#[macro_export]
macro_rules! security_event {
    ($event:expr, $($field:tt)*) => {
        tracing::warn!(
            security.event = $event,
            $($field)*
        )
    };
}

/// Record a failed operation on the current span with an error message
pub fn record_error(message: &str) {
    Span::current().record("error.message", message);
}

/// Record authentication success/failure on the current span
pub fn record_auth_result(success: bool) {
    Span::current().record("auth.success", success);
}

/// Record the authenticated role on the current span
pub fn record_user_role(role: &str) {
    Span::current().record("user.role", role);
}

/// Record HTTP status code on the current span
pub fn record_http_status(status: u16) {
    Span::current().record("http.status_code", status);
}
