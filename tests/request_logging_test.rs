// ABOUTME: Tests that every request, including rejected credentials, reaches the request logger
// ABOUTME: Captures formatted events into a buffer through a thread-local subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::io;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use common::{create_test_app, create_test_user};
use helpers::axum_test::AxumTestRequest;
use tracing::Level;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_rejected_and_authenticated_requests_are_logged() {
    let (resources, router) = create_test_app().await.unwrap();
    let (kalle, auth) = create_test_user(&resources, "kalle").await.unwrap();

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let rejected = AxumTestRequest::get("/auth/user")
        .auth("Bearer not-a-token")
        .send(router.clone())
        .await;
    assert_eq!(rejected.status_code(), StatusCode::UNAUTHORIZED);
    let after_rejection = logs.contents();
    assert!(after_rejection.contains("HTTP request"), "{after_rejection}");
    assert!(after_rejection.contains("http.status=401"), "{after_rejection}");

    let accepted = AxumTestRequest::get("/auth/user")
        .auth(&auth)
        .send(router)
        .await;
    assert_eq!(accepted.status_code(), StatusCode::OK);
    let after_success = logs.contents();
    assert!(after_success.contains("http.status=200"), "{after_success}");
    assert!(
        after_success.contains(&format!("user.id=Some({})", kalle.id)),
        "{after_success}"
    );
}
