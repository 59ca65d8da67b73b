use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize basic console logging.
///
/// Used when the observability layer is disabled, at compile time or via
/// `OBSERVABILITY_ENABLED=false`.
///
/// # Configuration
///
/// - **Log Level**: Controlled by `LOG_LEVEL` environment variable (default: "info")
/// - **Filtering**: HTTP client internals filtered to warn level
/// - **Format**: Compact format written to stderr so prompts on stdout stay clean
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}

/// Filter directives shared by every logging setup: our crates at
/// `log_level`, noisy HTTP internals at warn.
pub fn default_directives(log_level: &str) -> String {
    format!(
        "agora={lvl},agora_auth={lvl},agora_core={lvl},reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn",
        lvl = log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives("debug");
        assert!(directives.contains("agora_auth=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
