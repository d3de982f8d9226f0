// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Generates request IDs, opens a span per request, and logs completed requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tasty_core::models::Principal;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::constants::headers::REQUEST_ID;
use crate::logging::AppLogger;

/// Generates `req_<uuid>` ids for requests that arrive without one
#[derive(Debug, Clone, Copy, Default)]
pub struct MakePrefixedRequestId;

impl MakeRequestId for MakePrefixedRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&format!("req_{}", Uuid::new_v4().simple()))
            .ok()
            .map(RequestId::new)
    }
}

/// Create a tracing span for an HTTP request
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        user_id = tracing::field::Empty,
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Log each completed request with its principal.
///
/// Runs outside [`crate::middleware::authenticate`] so rejected credentials
/// are logged too; the principal is read back from the response.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    let user_id = response
        .extensions()
        .get::<Principal>()
        .and_then(Principal::user_id);

    let status = response.status().as_u16();
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let span = Span::current();
    span.record("status_code", status);
    span.record("duration_ms", duration_ms);
    AppLogger::log_api_request(&method, &path, status, duration_ms, user_id);
    if status == StatusCode::FORBIDDEN.as_u16() {
        AppLogger::log_permission_denied(&method, &path, user_id);
    }

    response
}
