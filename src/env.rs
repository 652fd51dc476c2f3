//! Environment variable names used by this crate for convenient
//! configuration of the formatter and sink from services.
//!
//! These are purely helpers; the formatter and sink types remain
//! decoupled from environment access.

/// Value of the `app` slot, e.g. `drupal`.
pub const SPLUNK_LOG_APP_ENV: &str = "SPLUNK_LOG_APP";

/// Site base URL exposed to custom templates as `!base_url`.
pub const SPLUNK_LOG_BASE_URL_ENV: &str = "SPLUNK_LOG_BASE_URL";

/// `utc` (default) or `local`.
pub const SPLUNK_LOG_TIMEZONE_ENV: &str = "SPLUNK_LOG_TIMEZONE";

/// `json` (default) or `verbatim`.
pub const SPLUNK_LOG_ENCODING_ENV: &str = "SPLUNK_LOG_ENCODING";

/// Sink target: `stdout` (default), `stderr`, `noop` or `file://<path>`.
pub const SPLUNK_LOG_TARGET_ENV: &str = "SPLUNK_LOG_TARGET";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
