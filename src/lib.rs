//! Client library for the AR B2B reporting REST API.
//!
//! The crate covers the engineering core of the client: the reversible
//! `AR-REST` authorization token codec, the strict Zulu timestamp codec used
//! as the wire format for all date fields, and the request pipeline that
//! merges configuration, attaches auth headers, emits lifecycle
//! notifications and classifies failures from the service's heterogeneous
//! JSON error bodies.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ar_rest_client::{
//!     ApiRequest, RequestOptions, RequestPipeline, ReqwestTransport, Settings, TokenBuilder,
//! };
//! use reqwest::Method;
//!
//! # async fn example() -> ar_rest_client::Result<()> {
//! let token = TokenBuilder::new("reporter", "secret").domain("example.org").build();
//!
//! let settings = Settings {
//!     auth_token: Some(token),
//!     base_uri: Some("https://reporting.example.org/v1/".to_string()),
//!     defaults: RequestOptions::default(),
//! };
//!
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let pipeline = RequestPipeline::new(settings, transport);
//!
//! let response =
//!     pipeline.execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default()).await?;
//! let report: serde_json::Value = ar_rest_client::decode_json(&response)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod time;

pub use api::classify::{classify_error_body, DEFAULT_FAILURE_MESSAGE};
pub use api::decode::decode_json;
pub use api::events::{AfterSend, BeforeSend, RequestFailed, RequestObserver};
pub use api::options::{RequestOptions, Settings, DEFAULT_TIMEOUT};
pub use api::pipeline::{user_agent, RequestPipeline};
pub use api::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport, TransportFailure};
pub use auth::token::{
    parse_token, AuthTokenInfo, TokenBuilder, DEFAULT_TOKEN_AGE_SECS, TOKEN_PREFIX,
};
pub use error::{ClientError, Result};
pub use time::{format_zulu, format_zulu_no_millis, parse_zulu};
