//! AR-REST authorization token codec
//!
//! The `Authorization` header carries an opaque, self-describing bearer
//! credential: `"AR-REST " + base64(user:timestamp:age:saltedHash)` where
//! the salted hash binds the password to the issuance window without
//! transmitting it. Generation and parsing are strictly symmetric.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use md5::{Digest, Md5};

use crate::error::{ClientError, Result};

/// Literal prefix of every token.
pub const TOKEN_PREFIX: &str = "AR-REST";

/// Default validity window: 48 hours.
pub const DEFAULT_TOKEN_AGE_SECS: i64 = 172_800;

/// Decoded identity claim recovered from an `AR-REST` token.
///
/// Constructed only by [`parse_token`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokenInfo {
    user: String,
    timestamp_unix: i64,
    age_seconds: i64,
    salted_hash: String,
}

impl AuthTokenInfo {
    /// Full user identifier, `username` or `username@domain`.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Token issuance time in unix seconds.
    pub fn timestamp_unix(&self) -> i64 {
        self.timestamp_unix
    }

    /// Length of the validity window in seconds.
    pub fn age_seconds(&self) -> i64 {
        self.age_seconds
    }

    /// Base64-encoded hash binding password, timestamp and age.
    pub fn salted_hash(&self) -> &str {
        &self.salted_hash
    }

    /// Part of `user` before the first `@`, or `None` when there is no `@`.
    pub fn username(&self) -> Option<&str> {
        self.user.split_once('@').map(|(username, _)| username)
    }

    /// Part of `user` after the first `@`, or `None` when there is no `@`.
    pub fn domain(&self) -> Option<&str> {
        self.user.split_once('@').map(|(_, domain)| domain)
    }
}

/// Builder for generating `AR-REST` tokens.
///
/// # Examples
///
/// ```
/// use ar_rest_client::TokenBuilder;
///
/// let token = TokenBuilder::new("test", "123")
///     .domain("test")
///     .age_seconds(5)
///     .timestamp_unix(1_483_634_723)
///     .build();
/// assert_eq!(token, "AR-REST dGVzdEB0ZXN0OjE0ODM2MzQ3MjM6NTpaVGZBTzQramFDdmhWMCs2elk1dWFnPT0=");
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder<'a> {
    username: &'a str,
    password: &'a str,
    domain: Option<&'a str>,
    age_seconds: i64,
    timestamp_unix: Option<i64>,
}

impl<'a> TokenBuilder<'a> {
    /// Start a token for `username` authenticated by `password`.
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            domain: None,
            age_seconds: DEFAULT_TOKEN_AGE_SECS,
            timestamp_unix: None,
        }
    }

    /// Append `@domain` to the username.
    pub fn domain(mut self, domain: &'a str) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Override the validity window (default 48 hours).
    pub fn age_seconds(mut self, age_seconds: i64) -> Self {
        self.age_seconds = age_seconds;
        self
    }

    /// Pin the issuance time; defaults to the current unix time.
    pub fn timestamp_unix(mut self, timestamp_unix: i64) -> Self {
        self.timestamp_unix = Some(timestamp_unix);
        self
    }

    /// Produce the `Authorization` header value.
    pub fn build(self) -> String {
        let user = match self.domain {
            Some(domain) => format!("{}@{}", self.username, domain),
            None => self.username.to_string(),
        };
        let timestamp = self.timestamp_unix.unwrap_or_else(|| Utc::now().timestamp());

        // Raw 16-byte MD5 digests, base64-encoded; never the hex string.
        let pass_hash = STANDARD.encode(Md5::digest(self.password.as_bytes()));
        let salted_input = format!("{timestamp}:{}:{pass_hash}", self.age_seconds);
        let salted_hash = STANDARD.encode(Md5::digest(salted_input.as_bytes()));

        let payload = format!("{user}:{timestamp}:{}:{salted_hash}", self.age_seconds);
        format!("{TOKEN_PREFIX} {}", STANDARD.encode(payload.as_bytes()))
    }
}

/// Parse an `AR-REST` token back into its claim.
///
/// The `AR-REST` literal is removed wherever it appears in the input (not
/// only as an anchored prefix) and the remainder is trimmed before strict
/// base64 decoding; real-world clients rely on that leniency.
///
/// # Errors
/// Returns `ClientError::TokenParse` when the payload is not strict base64,
/// not UTF-8, has fewer than four `:`-separated fields, or when the
/// timestamp or age field is not numeric.
pub fn parse_token(token: &str) -> Result<AuthTokenInfo> {
    let stripped = token.replace(TOKEN_PREFIX, "");
    let trimmed = stripped.trim();

    let decoded = STANDARD.decode(trimmed).map_err(|_| ClientError::token_parse())?;
    let decoded = String::from_utf8(decoded).map_err(|_| ClientError::token_parse())?;

    let mut parts = decoded.splitn(4, ':');
    let (Some(user), Some(timestamp), Some(age), Some(salted_hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClientError::token_parse());
    };

    if user.is_empty() || salted_hash.is_empty() {
        return Err(ClientError::token_parse());
    }
    let timestamp_unix = timestamp.parse::<i64>().map_err(|_| ClientError::token_parse())?;
    let age_seconds = age.parse::<i64>().map_err(|_| ClientError::token_parse())?;

    Ok(AuthTokenInfo {
        user: user.to_string(),
        timestamp_unix,
        age_seconds,
        salted_hash: salted_hash.to_string(),
    })
}
