//! Request lifecycle hooks.
//!
//! The API client reports every call to a single injected [`RequestObserver`]
//! at three points: before sending, when a response arrives, and when a
//! failure is raised. The default [`TracingObserver`] turns those into
//! `tracing` events.

use crate::error::CollectionError;
use crate::transport::HttpRequest;

pub trait RequestObserver: Send + Sync {
    fn on_request(&self, _request: &HttpRequest) {}

    fn on_response(&self, _request: &HttpRequest, _status: u16) {}

    fn on_error(&self, _request: &HttpRequest, _error: &CollectionError) {}
}

/// Emits `tracing` events for each request. Header values are never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, request: &HttpRequest) {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            authorized = request.header("Authorization").is_some(),
            has_body = request.body.is_some(),
            "sending request"
        );
    }

    fn on_response(&self, request: &HttpRequest, status: u16) {
        tracing::debug!(method = %request.method, url = %request.url, status, "response received");
    }

    fn on_error(&self, request: &HttpRequest, error: &CollectionError) {
        tracing::warn!(method = %request.method, url = %request.url, %error, "request failed");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}
