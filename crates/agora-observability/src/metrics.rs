use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::logging::is_observability_enabled;

/// Install the Prometheus recorder.
///
/// Returns None if observability is disabled or a recorder is already
/// installed. The handle renders the current counters in text format.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

// Login metrics helpers

pub fn track_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("agora_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("agora_logins_total", "reason" => reason.to_string(), "status" => "failure")
        .increment(1);
}

pub fn track_otp_resend() {
    if !is_observability_enabled() {
        return;
    }
    counter!("agora_otp_resends_total").increment(1);
}

/// A login that returned tokens without the OTP step.
pub fn track_legacy_login() {
    if !is_observability_enabled() {
        return;
    }
    counter!("agora_legacy_logins_total").increment(1);
}
