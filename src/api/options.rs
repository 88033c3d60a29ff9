//! Per-call and process-wide request configuration
//!
//! `Settings` holds process-wide state (auth token, base URI, default
//! transport options); `RequestOptions` is the ephemeral per-call overlay.
//! Merging follows "per-call overrides global": scalar fields from the
//! per-call side win, while the `headers` and `extra` maps merge key-by-key
//! with the per-call entry winning.

use std::collections::HashMap;
use std::time::Duration;

/// Transport timeout applied when neither side configures one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Ephemeral per-call options, merged over [`Settings::defaults`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Base URI relative request paths resolve against.
    pub base_uri: Option<String>,
    /// Transport timeout; defaults to 60 seconds after merging.
    pub timeout: Option<Duration>,
    /// TLS certificate verification; defaults to `true` after merging.
    pub verify_tls: Option<bool>,
    /// Headers attached to the outgoing request.
    pub headers: HashMap<String, String>,
    /// Arbitrary transport passthrough values, merged shallowly.
    pub extra: HashMap<String, serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = Some(verify_tls);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Effective timeout after defaulting.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Effective TLS verification flag after defaulting.
    pub fn should_verify_tls(&self) -> bool {
        self.verify_tls.unwrap_or(true)
    }

    /// Merge these per-call options over `defaults`.
    pub fn merged_over(&self, defaults: &RequestOptions) -> RequestOptions {
        let mut headers = defaults.headers.clone();
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut extra = defaults.extra.clone();
        extra.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        RequestOptions {
            base_uri: self.base_uri.clone().or_else(|| defaults.base_uri.clone()),
            timeout: self.timeout.or(defaults.timeout),
            verify_tls: self.verify_tls.or(defaults.verify_tls),
            headers,
            extra,
        }
    }
}

/// Process-wide client configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Stored `Authorization` header value (an `AR-REST` token string).
    pub auth_token: Option<String>,
    /// Base URI for relative request paths.
    pub base_uri: Option<String>,
    /// Default transport options merged under every call's options.
    pub defaults: RequestOptions,
}
