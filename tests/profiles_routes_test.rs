// ABOUTME: Integration tests for profile endpoints
// ABOUTME: Covers automatic creation, derived counts, follower filters, and owner-only edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use axum::Router;
use common::{create_test_app, create_test_user};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use tasty_treats_server::pagination::Page;
use tasty_treats_server::routes::{ProfileResponse, TokenResponse};

async fn register(router: &Router, username: &str) -> TokenResponse {
    AxumTestRequest::post("/auth/register")
        .json(&json!({"username": username, "password": "correct-horse-battery"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

async fn follow(router: &Router, auth: &str, followed: i64) {
    AxumTestRequest::post("/followers")
        .auth(auth)
        .json(&json!({"followed": followed}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);
}

fn owners(page: &Page<ProfileResponse>) -> Vec<&str> {
    let mut names: Vec<&str> = page.results.iter().map(|p| p.owner.as_str()).collect();
    names.sort_unstable();
    names
}

#[tokio::test]
async fn test_registration_creates_profile() {
    let (_resources, router) = create_test_app().await.unwrap();
    let token = register(&router, "kalle").await;
    let profile_id = token.user.profile_id.expect("profile created with user");

    let profile: ProfileResponse = AxumTestRequest::get(&format!("/profiles/{profile_id}"))
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(profile.owner, "kalle");
    assert_eq!(profile.image, "images/default_profile.jpg");
    assert_eq!(profile.recipes_count, 0);
    assert!(!profile.is_owner);
}

#[tokio::test]
async fn test_counts_and_following_id() {
    let (resources, router) = create_test_app().await.unwrap();
    let (kalle_user, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna_user, anna) = create_test_user(&resources, "anna").await.unwrap();

    for (name, status) in [("Draft", "pending_publish"), ("Public", "published")] {
        AxumTestRequest::post("/recipes")
            .auth(&kalle)
            .json(&json!({"recipe_name": name, "status": status}))
            .send(router.clone())
            .await
            .assert_status(StatusCode::CREATED);
    }
    follow(&router, &anna, kalle_user.id).await;

    let kalle_profile = resources
        .database
        .profiles()
        .get_profile_by_owner(kalle_user.id)
        .await
        .unwrap()
        .unwrap();

    let seen_by_anna: ProfileResponse =
        AxumTestRequest::get(&format!("/profiles/{}", kalle_profile.id))
            .auth(&anna)
            .send(router.clone())
            .await
            .json();
    assert_eq!(seen_by_anna.recipes_count, 1, "drafts are not counted for others");
    assert_eq!(seen_by_anna.followers_count, 1);
    assert_eq!(seen_by_anna.following_count, 0);
    assert!(seen_by_anna.following_id.is_some());

    let anonymous: ProfileResponse = AxumTestRequest::get(&format!("/profiles/{}", kalle_profile.id))
        .send(router.clone())
        .await
        .json();
    assert!(anonymous.following_id.is_none());
    assert_eq!(anonymous.recipes_count, 1);

    let seen_by_kalle: ProfileResponse =
        AxumTestRequest::get(&format!("/profiles/{}", kalle_profile.id))
            .auth(&kalle)
            .send(router)
            .await
            .json();
    assert_eq!(seen_by_kalle.recipes_count, 2);
}

#[tokio::test]
async fn test_follower_filters() {
    let (resources, router) = create_test_app().await.unwrap();
    let (kalle_user, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (anna_user, anna) = create_test_user(&resources, "anna").await.unwrap();
    let (mikko_user, mikko) = create_test_user(&resources, "mikko").await.unwrap();

    follow(&router, &anna, kalle_user.id).await;
    follow(&router, &mikko, kalle_user.id).await;
    follow(&router, &kalle, anna_user.id).await;

    let profiles = resources.database.profiles();
    let kalle_profile = profiles.get_profile_by_owner(kalle_user.id).await.unwrap().unwrap();
    let mikko_profile = profiles.get_profile_by_owner(mikko_user.id).await.unwrap().unwrap();

    let kalles_followers: Page<ProfileResponse> =
        AxumTestRequest::get(&format!("/profiles?follows_profile={}", kalle_profile.id))
            .send(router.clone())
            .await
            .assert_status(StatusCode::OK)
            .json();
    assert_eq!(owners(&kalles_followers), vec!["anna", "mikko"]);

    let kalle_follows: Page<ProfileResponse> =
        AxumTestRequest::get(&format!("/profiles?followed_by_profile={}", kalle_profile.id))
            .send(router.clone())
            .await
            .json();
    assert_eq!(owners(&kalle_follows), vec!["anna"]);

    let mikko_follows: Page<ProfileResponse> =
        AxumTestRequest::get(&format!("/profiles?followed_by_profile={}", mikko_profile.id))
            .send(router.clone())
            .await
            .json();
    assert_eq!(owners(&mikko_follows), vec!["kalle"]);

    let by_followers: Page<ProfileResponse> =
        AxumTestRequest::get("/profiles?ordering=-followers_count")
            .send(router)
            .await
            .json();
    assert_eq!(by_followers.count, 3);
    assert_eq!(by_followers.results[0].owner, "kalle");
    assert_eq!(by_followers.results[0].followers_count, 2);
}

#[tokio::test]
async fn test_profile_edit_is_owner_only() {
    let (resources, router) = create_test_app().await.unwrap();
    let (kalle_user, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna_user, anna) = create_test_user(&resources, "anna").await.unwrap();
    let profile = resources
        .database
        .profiles()
        .get_profile_by_owner(kalle_user.id)
        .await
        .unwrap()
        .unwrap();
    let uri = format!("/profiles/{}", profile.id);

    AxumTestRequest::patch(&uri)
        .auth(&anna)
        .json(&json!({"name": "Not Kalle"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    AxumTestRequest::patch(&uri)
        .json(&json!({"name": "Anonymous"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let updated: ProfileResponse = AxumTestRequest::put(&uri)
        .auth(&kalle)
        .json(&json!({"name": "Kalle K.", "content": "Baker", "image": ""}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated.name, "Kalle K.");
    assert_eq!(updated.content, "Baker");
    assert_eq!(updated.image, "images/default_profile.jpg");
    assert!(updated.is_owner);

    let body: Value = AxumTestRequest::patch(&uri)
        .auth(&kalle)
        .json(&json!({"name": "x".repeat(256)}))
        .send(router)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_missing_profile_is_not_found() {
    let (_resources, router) = create_test_app().await.unwrap();
    AxumTestRequest::get("/profiles/777")
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
