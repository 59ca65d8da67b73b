//! Agora Observability Module
//!
//! Provides configurable observability for the Agora client:
//! - Console logging for every build
//! - Structured JSON log files (daily rolling)
//! - Login metrics via a Prometheus recorder
//! - Span field helpers and a security event macro for the authentication flow
//!
//! The file/metrics layer can be disabled at compile time via the
//! `observability` feature flag, and at runtime via the `OBSERVABILITY_ENABLED`
//! environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use agora_observability::init_tracing;
//!
//! init_tracing();
//! // ... application code ...
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;
pub mod tracing_utils;

pub use basic_logging::init_basic_console_logging;

// Re-export PrometheusHandle type when observability is enabled
#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

// Public exports when observability is enabled
#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled};
#[cfg(feature = "observability")]
pub use self::metrics::{
    init_metrics, track_legacy_login, track_login_failure, track_login_success, track_otp_resend,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    /// No-op observability check when feature disabled
    pub fn is_observability_enabled() -> bool {
        false
    }

    /// Console logging only when feature disabled
    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }

    /// No-op metrics initialization when feature disabled
    pub fn init_metrics() -> Option<()> {
        None
    }

    // No-op tracking functions
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_otp_resend() {}
    pub fn track_legacy_login() {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
