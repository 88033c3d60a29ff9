//! Request lifecycle notifications
//!
//! The pipeline notifies registered observers synchronously: `BeforeSend`
//! fires exactly once before every attempt, then exactly one of `AfterSend`
//! or `RequestFailed` fires for the attempt's outcome. Events are read-only
//! views; observers must not assume they outlive the call.

use crate::api::options::RequestOptions;
use crate::api::transport::{ApiRequest, ApiResponse};

/// Fired after option merging and header injection, before the exchange.
#[derive(Debug)]
pub struct BeforeSend<'a> {
    pub request: &'a ApiRequest,
    pub options: &'a RequestOptions,
}

/// Fired once a successful response has been received.
#[derive(Debug)]
pub struct AfterSend<'a> {
    pub request: &'a ApiRequest,
    pub response: &'a ApiResponse,
    /// Exchange duration in whole milliseconds, rounded.
    pub elapsed_ms: u64,
}

/// Fired when the attempt fails; the response may be absent for
/// connection-level failures.
#[derive(Debug)]
pub struct RequestFailed<'a> {
    pub request: &'a ApiRequest,
    pub response: Option<&'a ApiResponse>,
}

/// Observer seam for external instrumentation (timing, logging).
///
/// All methods default to no-ops so implementors subscribe only to what they
/// need. Notifications are blocking; the pipeline does not proceed until
/// every observer has returned.
pub trait RequestObserver: Send + Sync {
    fn on_before_send(&self, _event: &BeforeSend<'_>) {}

    fn on_after_send(&self, _event: &AfterSend<'_>) {}

    fn on_failed(&self, _event: &RequestFailed<'_>) {}
}
