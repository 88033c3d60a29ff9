//! Authorization token handling for the reporting API.

pub mod token;

pub use token::{parse_token, AuthTokenInfo, TokenBuilder, DEFAULT_TOKEN_AGE_SECS, TOKEN_PREFIX};
