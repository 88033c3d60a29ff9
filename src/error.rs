//! Crate-wide error types
//!
//! Two HTTP-level kinds are always distinguishable by callers: `Transport`
//! (the exchange failed, or the service reported a business error) and
//! `Decode` (a response arrived but its body was not the JSON it had to be).
//! Token and timestamp parsing have their own variants so they never get
//! conflated with the HTTP kinds.

use thiserror::Error;

use crate::api::classify::resolve_failure_message;
use crate::api::transport::{ApiRequest, ApiResponse};

/// Standard result type for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A request was sent but the exchange failed, or the server answered
    /// with a service-level error body. Carries the original request and the
    /// response if one was received.
    #[error("{message}")]
    Transport {
        message: String,
        request: Box<ApiRequest>,
        response: Option<Box<ApiResponse>>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response was received but its body could not be parsed as JSON
    /// where JSON was mandatory.
    #[error("wrong json: {detail}")]
    Decode { detail: String, response: Box<ApiResponse> },

    /// An `AR-REST` token did not survive parsing.
    #[error("{0}")]
    TokenParse(String),

    /// A wire timestamp did not match the Zulu format.
    #[error("cannot parse timestamp '{value}': {detail}")]
    Format { value: String, detail: String },

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build a `Transport` error, resolving the human-readable message
    /// through the priority chain: explicit message, then a message
    /// classified out of the response body, then the cause's message, then
    /// the generic default.
    pub fn transport(
        request: ApiRequest,
        response: Option<ApiResponse>,
        message: Option<&str>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let cause_message = source.as_ref().map(|err| err.to_string());
        let message = resolve_failure_message(message, response.as_ref(), cause_message.as_deref());
        Self::Transport {
            message,
            request: Box::new(request),
            response: response.map(Box::new),
            source,
        }
    }

    pub(crate) fn token_parse() -> Self {
        Self::TokenParse("Cannot parse token".to_string())
    }

    /// The request that triggered this error, when the error kind carries
    /// one.
    pub fn request(&self) -> Option<&ApiRequest> {
        match self {
            Self::Transport { request, .. } => Some(request),
            _ => None,
        }
    }

    /// The response attached to this error, if any was received.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Transport { response, .. } => response.as_deref(),
            Self::Decode { response, .. } => Some(response),
            _ => None,
        }
    }
}
