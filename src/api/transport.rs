//! Transport seam and exchange value types
//!
//! The pipeline talks to the network through the [`Transport`] trait so
//! tests can substitute a scripted implementation. The production transport
//! wraps `reqwest`; it performs exactly one attempt and reports any HTTP
//! response as `Ok` (status classification is the pipeline's job), failing
//! only on connection-level problems.

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Method;
use tracing::debug;

use crate::api::options::RequestOptions;
use crate::error::ClientError;

/// Outgoing request as the pipeline sees it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL, or a path to be resolved against the effective base
    /// URI.
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: HashMap::new(), body: None }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a JSON body and the matching `Content-Type` header.
    ///
    /// # Errors
    /// Returns `ClientError::Config` when the value cannot be serialized.
    pub fn with_json_body<T: serde::Serialize>(mut self, value: &T) -> Result<Self, ClientError> {
        let body = serde_json::to_vec(value)
            .map_err(|err| ClientError::Config(format!("cannot serialize request body: {err}")))?;
        self.body = Some(body);
        self.headers.insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }
}

/// Raw response handed back to the decoder stage.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily converted for error reporting.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Connection-level failure (refused, timeout, TLS, ...). The response is
/// present only when the failure happened after one was received.
#[derive(Debug)]
pub struct TransportFailure {
    pub message: String,
    pub response: Option<ApiResponse>,
}

/// Send-request-get-response collaborator.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single exchange. Implementations must not retry.
    async fn send(
        &self,
        request: &ApiRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse, TransportFailure>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    // Built lazily, only for calls that disable certificate verification.
    insecure_client: OnceCell<reqwest::Client>,
}

impl ReqwestTransport {
    /// Build the transport with certificate verification enabled.
    ///
    /// # Errors
    /// Returns `ClientError::Config` when the underlying client cannot be
    /// constructed.
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ClientError::Config(format!("cannot build http client: {err}")))?;
        Ok(Self { client, insecure_client: OnceCell::new() })
    }

    fn client_for(&self, options: &RequestOptions) -> Result<&reqwest::Client, TransportFailure> {
        if options.should_verify_tls() {
            return Ok(&self.client);
        }
        self.insecure_client.get_or_try_init(|| {
            reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(|err| TransportFailure {
                    message: format!("cannot build http client: {err}"),
                    response: None,
                })
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse, TransportFailure> {
        let client = self.client_for(options)?;

        let mut builder = client
            .request(request.method.clone(), request.url.as_str())
            .timeout(options.effective_timeout());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|err| TransportFailure { message: err.to_string(), response: None })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportFailure { message: err.to_string(), response: None })?
            .to_vec();
        debug!(status, "received response");

        Ok(ApiResponse { status, headers, body })
    }
}
