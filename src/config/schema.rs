//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Retry bound used when none is configured.
pub const DEFAULT_RETRY_BOUND: u32 = 3;

/// Header that opts a request out of reauthentication. Only its presence
/// matters.
///
/// Clients that already mark requests with `FourOhOneAuthenticatorIgnore`
/// can keep doing so by setting `reauth.ignore_header` to that name.
pub const DEFAULT_IGNORE_HEADER: &str = "X-Reauth-Ignore";

/// Root configuration for the authenticating client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Reauthentication coordinator settings.
    pub reauth: ReauthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// Honour HTTP(S)_PROXY environment variables.
    pub system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            reauth: ReauthConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            user_agent: concat!("authretry/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// Reauthentication settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReauthConfig {
    /// Attempts (original request included) before giving up. Must be >= 1.
    pub retry_bound: u32,

    /// Requests whose original attempt carries this header are never retried.
    pub ignore_header: String,

    /// Also call `unable_to_authenticate` when the reauthenticate callback
    /// declines before the bound is reached.
    pub notify_on_decline: bool,
}

impl Default for ReauthConfig {
    fn default() -> Self {
        Self {
            retry_bound: DEFAULT_RETRY_BOUND,
            ignore_header: DEFAULT_IGNORE_HEADER.to_string(),
            notify_on_decline: false,
        }
    }
}

/// Timeout configuration for the underlying HTTP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connect timeout in seconds.
    pub connect_secs: u64,

    /// Whole-request timeout in seconds, per attempt.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
