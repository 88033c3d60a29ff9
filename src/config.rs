//! Environment-based configuration loading
//!
//! `Settings` can always be constructed explicitly; this loader covers the
//! common deployment case where the token and base URI arrive through the
//! environment.
//!
//! ## Environment variables
//! - `AR_AUTH_TOKEN`: stored `Authorization` header value
//! - `AR_BASE_URI`: base URI for relative request paths
//! - `AR_TIMEOUT_SECS`: default transport timeout in seconds
//! - `AR_VERIFY_TLS`: default TLS verification flag (`true`/`false`/`1`/`0`)

use std::time::Duration;

use crate::api::options::{RequestOptions, Settings};
use crate::error::{ClientError, Result};

pub const ENV_AUTH_TOKEN: &str = "AR_AUTH_TOKEN";
pub const ENV_BASE_URI: &str = "AR_BASE_URI";
pub const ENV_TIMEOUT_SECS: &str = "AR_TIMEOUT_SECS";
pub const ENV_VERIFY_TLS: &str = "AR_VERIFY_TLS";

/// Load settings from the environment. Unset variables leave the
/// corresponding field at its default; malformed values are errors.
///
/// # Errors
/// Returns `ClientError::Config` when `AR_TIMEOUT_SECS` is not an integer
/// or `AR_VERIFY_TLS` is not a recognized boolean.
pub fn load_from_env() -> Result<Settings> {
    let auth_token = std::env::var(ENV_AUTH_TOKEN).ok();
    let base_uri = std::env::var(ENV_BASE_URI).ok();

    let mut defaults = RequestOptions::default();
    if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
        let secs = raw.parse::<u64>().map_err(|err| {
            ClientError::Config(format!("invalid {ENV_TIMEOUT_SECS} '{raw}': {err}"))
        })?;
        defaults.timeout = Some(Duration::from_secs(secs));
    }
    if let Ok(raw) = std::env::var(ENV_VERIFY_TLS) {
        defaults.verify_tls = Some(parse_bool(ENV_VERIFY_TLS, &raw)?);
    }

    Ok(Settings { auth_token, base_uri, defaults })
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ClientError::Config(format!("invalid {name} '{raw}': expected a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boolean_spellings() {
        for raw in ["true", "1", "yes", "TRUE"] {
            assert!(parse_bool(ENV_VERIFY_TLS, raw).expect("should parse"));
        }
        for raw in ["false", "0", "no", "False"] {
            assert!(!parse_bool(ENV_VERIFY_TLS, raw).expect("should parse"));
        }
        assert!(parse_bool(ENV_VERIFY_TLS, "maybe").is_err());
    }
}
