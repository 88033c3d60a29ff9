//! Request orchestration
//!
//! One call, one attempt: merge the per-call options over the process-wide
//! defaults, inject the `Authorization` and `User-Agent` headers, notify
//! observers, perform the exchange through the transport, and classify any
//! failure. Nothing is retried; every failure surfaces synchronously as a
//! typed error.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;
use tracing::{debug, warn};
use url::Url;

use crate::api::events::{AfterSend, BeforeSend, RequestFailed, RequestObserver};
use crate::api::options::{RequestOptions, Settings};
use crate::api::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::{ClientError, Result};

const AUTHORIZATION_HEADER: &str = "Authorization";
const USER_AGENT_HEADER: &str = "User-Agent";

// Memoized pure computation; a concurrent first call converges on the same
// value because nothing here depends on call order.
static USER_AGENT: Lazy<String> =
    Lazy::new(|| format!("{}/{} reqwest", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));

/// Process-wide `User-Agent` value attached to every request.
pub fn user_agent() -> &'static str {
    &USER_AGENT
}

/// Orchestrator for a single API exchange.
pub struct RequestPipeline {
    settings: Settings,
    transport: Arc<dyn Transport>,
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl RequestPipeline {
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self { settings, transport, observers: Vec::new() }
    }

    /// Register an observer for lifecycle notifications. Observers are
    /// notified synchronously, in registration order.
    pub fn add_observer(&mut self, observer: Arc<dyn RequestObserver>) {
        self.observers.push(observer);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Execute one request: exactly one attempt, exactly one terminal
    /// outcome.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` for connection-level failures and
    /// for non-2xx responses (with the service message classified out of the
    /// body when possible), and `ClientError::Config` when the request URL
    /// cannot be resolved.
    pub async fn execute(
        &self,
        request: ApiRequest,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let options = options.merged_over(&self.settings.defaults);

        let mut request = request;
        request.url = self.resolve_url(&request.url, &options)?;

        // Headers set directly on the request win over merged option
        // headers, which win over the injected defaults.
        for (name, value) in &options.headers {
            request.headers.entry(name.clone()).or_insert_with(|| value.clone());
        }
        if let Some(token) = &self.settings.auth_token {
            request.headers.entry(AUTHORIZATION_HEADER.to_string()).or_insert_with(|| token.clone());
        }
        request.headers.entry(USER_AGENT_HEADER.to_string()).or_insert_with(|| user_agent().to_string());

        let before = BeforeSend { request: &request, options: &options };
        for observer in &self.observers {
            observer.on_before_send(&before);
        }

        debug!(method = %request.method, url = %request.url, "dispatching api request");
        let start = Instant::now();
        match self.transport.send(&request, &options).await {
            Ok(response) if response.is_success() => {
                let elapsed_ms = elapsed_whole_millis(start);
                let after = AfterSend { request: &request, response: &response, elapsed_ms };
                for observer in &self.observers {
                    observer.on_after_send(&after);
                }
                debug!(status = response.status, elapsed_ms, "api request succeeded");
                Ok(response)
            }
            Ok(response) => {
                self.notify_failed(&request, Some(&response));
                warn!(status = response.status, "service reported an error");
                Err(ClientError::transport(request, Some(response), None, None))
            }
            Err(failure) => {
                self.notify_failed(&request, failure.response.as_ref());
                warn!(error = %failure.message, "api request failed");
                let cause: Box<dyn std::error::Error + Send + Sync> = failure.message.into();
                Err(ClientError::transport(request, failure.response, None, Some(cause)))
            }
        }
    }

    fn notify_failed(&self, request: &ApiRequest, response: Option<&ApiResponse>) {
        let event = RequestFailed { request, response };
        for observer in &self.observers {
            observer.on_failed(&event);
        }
    }

    fn resolve_url(&self, raw: &str, options: &RequestOptions) -> Result<String> {
        if let Ok(absolute) = Url::parse(raw) {
            return Ok(absolute.to_string());
        }

        let base = options
            .base_uri
            .as_deref()
            .or(self.settings.base_uri.as_deref())
            .ok_or_else(|| {
                ClientError::Config("relative request path requires a configured base URI".into())
            })?;
        let base = Url::parse(base)
            .map_err(|err| ClientError::Config(format!("invalid base URI '{base}': {err}")))?;
        base.join(raw)
            .map(|url| url.to_string())
            .map_err(|err| ClientError::Config(format!("cannot resolve '{raw}': {err}")))
    }
}

fn elapsed_whole_millis(start: Instant) -> u64 {
    // Rounded to the nearest millisecond, not truncated.
    (start.elapsed().as_secs_f64() * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::Method;

    use super::*;
    use crate::api::transport::TransportFailure;

    /// Transport scripted with a single outcome; panics if asked twice,
    /// which pins the no-retry contract.
    struct ScriptedTransport {
        outcome: Mutex<Option<std::result::Result<ApiResponse, TransportFailure>>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn ok(status: u16, body: &str) -> Self {
            Self::with(Ok(ApiResponse {
                status,
                headers: HashMap::new(),
                body: body.as_bytes().to_vec(),
            }))
        }

        fn failing(message: &str) -> Self {
            Self::with(Err(TransportFailure { message: message.to_string(), response: None }))
        }

        fn with(outcome: std::result::Result<ApiResponse, TransportFailure>) -> Self {
            Self { outcome: Mutex::new(Some(outcome)), seen: Mutex::new(Vec::new()) }
        }

        fn last_request(&self) -> ApiRequest {
            self.seen.lock().unwrap().last().cloned().expect("a request was sent")
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            request: &ApiRequest,
            _options: &RequestOptions,
        ) -> std::result::Result<ApiResponse, TransportFailure> {
            self.seen.lock().unwrap().push(request.clone());
            self.outcome.lock().unwrap().take().expect("transport invoked more than once")
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RequestObserver for RecordingObserver {
        fn on_before_send(&self, _event: &BeforeSend<'_>) {
            self.events.lock().unwrap().push("before".to_string());
        }

        fn on_after_send(&self, event: &AfterSend<'_>) {
            self.events.lock().unwrap().push(format!("after:{}", event.response.status));
        }

        fn on_failed(&self, event: &RequestFailed<'_>) {
            let with_response = event.response.is_some();
            self.events.lock().unwrap().push(format!("failed:{with_response}"));
        }
    }

    fn settings_with_token() -> Settings {
        Settings {
            auth_token: Some("AR-REST abc123".to_string()),
            base_uri: Some("https://reporting.example.org/v1/".to_string()),
            defaults: RequestOptions::default(),
        }
    }

    fn pipeline_with(
        transport: Arc<ScriptedTransport>,
        observer: Arc<RecordingObserver>,
    ) -> RequestPipeline {
        let mut pipeline = RequestPipeline::new(settings_with_token(), transport);
        pipeline.add_observer(observer);
        pipeline
    }

    #[tokio::test]
    async fn successful_call_fires_before_then_after() {
        let transport = Arc::new(ScriptedTransport::ok(200, "{}"));
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = pipeline_with(Arc::clone(&transport), Arc::clone(&observer));

        let response = pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default())
            .await
            .expect("should succeed");

        assert_eq!(response.status, 200);
        assert_eq!(*observer.events.lock().unwrap(), vec!["before", "after:200"]);
    }

    #[tokio::test]
    async fn failing_call_fires_before_then_failed() {
        let transport = Arc::new(ScriptedTransport::failing("connection refused"));
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = pipeline_with(Arc::clone(&transport), Arc::clone(&observer));

        let err = pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default())
            .await
            .expect_err("should fail");

        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(*observer.events.lock().unwrap(), vec!["before", "failed:false"]);
    }

    #[tokio::test]
    async fn non_success_status_fires_failed_with_classified_message() {
        let transport =
            Arc::new(ScriptedTransport::ok(400, r#"{"type":"A","name":"B","message":"C"}"#));
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = pipeline_with(Arc::clone(&transport), Arc::clone(&observer));

        let err = pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default())
            .await
            .expect_err("should fail");

        assert_eq!(err.to_string(), "A: B (C)");
        assert_eq!(err.response().map(|r| r.status), Some(400));
        assert_eq!(*observer.events.lock().unwrap(), vec!["before", "failed:true"]);
    }

    #[tokio::test]
    async fn injects_auth_and_user_agent_headers() {
        let transport = Arc::new(ScriptedTransport::ok(200, "{}"));
        let pipeline =
            RequestPipeline::new(settings_with_token(), Arc::clone(&transport) as Arc<dyn Transport>);

        pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default())
            .await
            .expect("should succeed");

        let sent = transport.last_request();
        assert_eq!(sent.headers.get(AUTHORIZATION_HEADER).map(String::as_str), Some("AR-REST abc123"));
        assert_eq!(sent.headers.get(USER_AGENT_HEADER).map(String::as_str), Some(user_agent()));
        assert_eq!(sent.url, "https://reporting.example.org/v1/reports");
    }

    #[tokio::test]
    async fn per_call_headers_win_over_injected_defaults() {
        let transport = Arc::new(ScriptedTransport::ok(200, "{}"));
        let pipeline =
            RequestPipeline::new(settings_with_token(), Arc::clone(&transport) as Arc<dyn Transport>);

        let options = RequestOptions::new().with_header(AUTHORIZATION_HEADER, "AR-REST override");
        pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), options)
            .await
            .expect("should succeed");

        let sent = transport.last_request();
        assert_eq!(
            sent.headers.get(AUTHORIZATION_HEADER).map(String::as_str),
            Some("AR-REST override")
        );
    }

    #[tokio::test]
    async fn absolute_urls_bypass_base_uri() {
        let transport = Arc::new(ScriptedTransport::ok(200, "{}"));
        let pipeline =
            RequestPipeline::new(settings_with_token(), Arc::clone(&transport) as Arc<dyn Transport>);

        pipeline
            .execute(
                ApiRequest::new(Method::GET, "https://other.example.org/status"),
                RequestOptions::default(),
            )
            .await
            .expect("should succeed");

        assert_eq!(transport.last_request().url, "https://other.example.org/status");
    }

    #[tokio::test]
    async fn relative_path_without_base_uri_is_a_config_error() {
        let transport = Arc::new(ScriptedTransport::ok(200, "{}"));
        let pipeline = RequestPipeline::new(Settings::default(), transport);

        let err = pipeline
            .execute(ApiRequest::new(Method::GET, "reports"), RequestOptions::default())
            .await
            .expect_err("should fail");

        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn user_agent_is_stable_and_versioned() {
        assert_eq!(user_agent(), user_agent());
        assert!(user_agent().starts_with("ar-rest-client/"));
        assert!(user_agent().contains("reqwest"));
    }
}
