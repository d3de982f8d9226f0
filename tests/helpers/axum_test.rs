// ABOUTME: In-process HTTP driver for the recipe API router
// ABOUTME: Sends one request through tower's oneshot and buffers the whole response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![allow(dead_code)]

use axum::body::{to_bytes, Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::ServiceExt;

/// A request under construction. Nothing is sent until [`AxumTestRequest::send`].
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
}

impl AxumTestRequest {
    fn with_method(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::with_method(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::with_method(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::with_method(Method::PUT, uri)
    }

    pub fn patch(uri: &str) -> Self {
        Self::with_method(Method::PATCH, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::with_method(Method::DELETE, uri)
    }

    /// Set a header, replacing any earlier value under the same name
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::try_from(name).expect("valid header name");
        let value = HeaderValue::try_from(value).expect("valid header value");
        self.headers.insert(name, value);
        self
    }

    /// Raw `Authorization` value, e.g. `"Bearer <token>"`
    pub fn auth(self, value: &str) -> Self {
        self.header(AUTHORIZATION.as_str(), value)
    }

    /// Serialize `payload` as the body and mark it `application/json`
    pub fn json<T: Serialize>(mut self, payload: &T) -> Self {
        self.body = Bytes::from(serde_json::to_vec(payload).expect("serializable payload"));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    pub async fn send(self, app: Router) -> AxumTestResponse {
        let mut request = Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(Body::from(self.body))
            .expect("request parts are valid");
        *request.headers_mut() = self.headers;

        let response = app.oneshot(request).await.expect("router is infallible");
        let (parts, body) = response.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .expect("response body is readable");

        AxumTestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// A fully buffered response
pub struct AxumTestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl AxumTestResponse {
    pub const fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body, panicking with the raw text when it does not match `T`
    pub fn json<T: DeserializeOwned>(self) -> T {
        match serde_json::from_slice(&self.body) {
            Ok(value) => value,
            Err(e) => panic!("body is not the expected JSON ({e}): {}", self.body_lossy()),
        }
    }

    pub fn text(self) -> String {
        self.body_lossy()
    }

    /// Panics with the body attached when the status differs
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status for body {}",
            self.body_lossy()
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::Json;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_get_returns_plain_body() {
        let app = Router::new().route("/ping", get(|| async { "pong" }));
        let response = AxumTestRequest::get("/ping").send(app).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.text(), "pong");
    }

    #[tokio::test]
    async fn test_json_body_reaches_handler() {
        let app = Router::new().route(
            "/echo",
            post(|Json(body): Json<Value>| async move { Json(json!({ "echo": body })) }),
        );
        let body: Value = AxumTestRequest::post("/echo")
            .json(&json!({ "name": "Pancakes" }))
            .send(app)
            .await
            .assert_status(StatusCode::OK)
            .json();
        assert_eq!(body["echo"]["name"], "Pancakes");
    }

    #[tokio::test]
    async fn test_auth_sets_authorization_header() {
        let app = Router::new().route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("missing")
                    .to_owned()
            }),
        );
        let response = AxumTestRequest::get("/whoami")
            .auth("Bearer abc")
            .send(app)
            .await;
        assert_eq!(response.text(), "Bearer abc");
    }
}
