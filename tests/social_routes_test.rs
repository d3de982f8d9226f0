// ABOUTME: Integration tests for comments, likes, and follower relationships
// ABOUTME: Checks author-only edits, duplicate and self-relationship messages, and counts
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
use tasty_treats_server::routes::{
    CommentResponse, FollowerResponse, LikeResponse, RecipeResponse,
};

async fn published_recipe(router: &Router, auth: &str, name: &str) -> i64 {
    let recipe: RecipeResponse = AxumTestRequest::post("/recipes")
        .auth(auth)
        .json(&json!({"recipe_name": name, "status": "published"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    recipe.id
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna, anna) = create_test_user(&resources, "anna").await.unwrap();
    let recipe = published_recipe(&router, &kalle, "Pancakes").await;

    let comment: CommentResponse = AxumTestRequest::post("/comments")
        .auth(&anna)
        .json(&json!({"recipe": recipe, "content": "Lovely!"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(comment.owner, "anna");
    assert!(comment.is_owner);
    assert!(comment.profile_id.is_some());

    let uri = format!("/comments/{}", comment.id);
    AxumTestRequest::put(&uri)
        .auth(&kalle)
        .json(&json!({"content": "Edited by someone else"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let untouched: CommentResponse = AxumTestRequest::get(&uri)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(untouched.content, "Lovely!");

    let edited: CommentResponse = AxumTestRequest::patch(&uri)
        .auth(&anna)
        .json(&json!({"content": "Lovely, made it twice"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(edited.content, "Lovely, made it twice");
    assert_eq!(edited.recipe, recipe);

    let listed: Page<CommentResponse> = AxumTestRequest::get(&format!("/comments?recipe={recipe}"))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed.count, 1);
    assert!(!listed.results[0].is_owner);

    let counted: RecipeResponse = AxumTestRequest::get(&format!("/recipes/{recipe}"))
        .send(router.clone())
        .await
        .json();
    assert_eq!(counted.comments_count, 1);

    AxumTestRequest::delete(&uri)
        .auth(&anna)
        .send(router.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::get(&uri)
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_comment_is_rejected() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let recipe = published_recipe(&router, &kalle, "Pancakes").await;

    let body: Value = AxumTestRequest::post("/comments")
        .auth(&kalle)
        .json(&json!({"recipe": recipe, "content": "   "}))
        .send(router)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["detail"], "content: This field may not be blank.");
}

#[tokio::test]
async fn test_comment_on_draft_of_another_user_is_not_found() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna, anna) = create_test_user(&resources, "anna").await.unwrap();

    let draft: RecipeResponse = AxumTestRequest::post("/recipes")
        .auth(&kalle)
        .json(&json!({"recipe_name": "Draft"}))
        .send(router.clone())
        .await
        .json();

    AxumTestRequest::post("/comments")
        .auth(&anna)
        .json(&json!({"recipe": draft.id, "content": "peek"}))
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Likes
// ============================================================================

#[tokio::test]
async fn test_duplicate_like_is_rejected() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna, anna) = create_test_user(&resources, "anna").await.unwrap();
    let recipe = published_recipe(&router, &kalle, "Pancakes").await;

    let like: LikeResponse = AxumTestRequest::post("/likes")
        .auth(&anna)
        .json(&json!({"recipe": recipe}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(like.owner, "anna");
    assert_eq!(like.recipe, recipe);

    let body: Value = AxumTestRequest::post("/likes")
        .auth(&anna)
        .json(&json!({"recipe": recipe}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["detail"], "You have already liked this recipe.");

    let likes: Page<LikeResponse> = AxumTestRequest::get("/likes").send(router).await.json();
    assert_eq!(likes.count, 1);
}

#[tokio::test]
async fn test_unlike_by_owner_only() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna, anna) = create_test_user(&resources, "anna").await.unwrap();
    let recipe = published_recipe(&router, &kalle, "Pancakes").await;

    let like: LikeResponse = AxumTestRequest::post("/likes")
        .auth(&anna)
        .json(&json!({"recipe": recipe}))
        .send(router.clone())
        .await
        .json();
    let uri = format!("/likes/{}", like.id);

    AxumTestRequest::delete(&uri)
        .auth(&kalle)
        .send(router.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    AxumTestRequest::delete(&uri)
        .auth(&anna)
        .send(router.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let counted: RecipeResponse = AxumTestRequest::get(&format!("/recipes/{recipe}"))
        .send(router)
        .await
        .json();
    assert_eq!(counted.likes_count, 0);
}

// ============================================================================
// Recipes leaving publication
// ============================================================================

#[tokio::test]
async fn test_comments_and_likes_follow_recipe_visibility() {
    let (resources, router) = create_test_app().await.unwrap();
    let (_kalle, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (_anna, anna) = create_test_user(&resources, "anna").await.unwrap();
    let recipe = published_recipe(&router, &kalle, "Pancakes").await;

    let comment: CommentResponse = AxumTestRequest::post("/comments")
        .auth(&anna)
        .json(&json!({"recipe": recipe, "content": "yum"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let like: LikeResponse = AxumTestRequest::post("/likes")
        .auth(&anna)
        .json(&json!({"recipe": recipe}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    AxumTestRequest::patch(&format!("/recipes/{recipe}"))
        .auth(&kalle)
        .json(&json!({"status": "pending_delete"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let comment_uri = format!("/comments/{}", comment.id);
    let like_uri = format!("/likes/{}", like.id);
    for auth in [None, Some(anna.as_str())] {
        let get = |uri: String| {
            let request = AxumTestRequest::get(&uri);
            match auth {
                Some(auth) => request.auth(auth),
                None => request,
            }
        };

        get(format!("/recipes/{recipe}"))
            .send(router.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let comments: Page<CommentResponse> = get(format!("/comments?recipe={recipe}"))
            .send(router.clone())
            .await
            .json();
        assert_eq!(comments.count, 0);
        assert!(comments.results.is_empty());
        let likes: Page<LikeResponse> = get("/likes".to_owned()).send(router.clone()).await.json();
        assert_eq!(likes.count, 0);

        get(comment_uri.clone())
            .send(router.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        get(like_uri.clone())
            .send(router.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    AxumTestRequest::patch(&comment_uri)
        .auth(&anna)
        .json(&json!({"content": "edited while hidden"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let owner_view: Page<CommentResponse> = AxumTestRequest::get(&format!("/comments?recipe={recipe}"))
        .auth(&kalle)
        .send(router.clone())
        .await
        .json();
    assert_eq!(owner_view.count, 1);
    assert_eq!(owner_view.results[0].content, "yum");
    let owner_likes: Page<LikeResponse> = AxumTestRequest::get("/likes")
        .auth(&kalle)
        .send(router)
        .await
        .json();
    assert_eq!(owner_likes.count, 1);
}

// ============================================================================
// Followers
// ============================================================================

#[tokio::test]
async fn test_follow_rules() {
    let (resources, router) = create_test_app().await.unwrap();
    let (kalle_user, kalle) = create_test_user(&resources, "kalle").await.unwrap();
    let (anna_user, anna) = create_test_user(&resources, "anna").await.unwrap();

    let follow: FollowerResponse = AxumTestRequest::post("/followers")
        .auth(&anna)
        .json(&json!({"followed": kalle_user.id}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(follow.owner, "anna");
    assert_eq!(follow.followed_name, "kalle");

    let duplicate: Value = AxumTestRequest::post("/followers")
        .auth(&anna)
        .json(&json!({"followed": kalle_user.id}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(duplicate["detail"], "Already following this user.");

    let own: Value = AxumTestRequest::post("/followers")
        .auth(&anna)
        .json(&json!({"followed": anna_user.id}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(own["detail"], "You cannot follow yourself.");

    let missing: Value = AxumTestRequest::post("/followers")
        .auth(&anna)
        .json(&json!({"followed": 4242}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(missing["detail"], "followed: Invalid pk \"4242\" - object does not exist.");

    let of_kalle: Page<FollowerResponse> =
        AxumTestRequest::get(&format!("/followers?followed={}", kalle_user.id))
            .send(router.clone())
            .await
            .json();
    assert_eq!(of_kalle.count, 1);

    let uri = format!("/followers/{}", follow.id);
    AxumTestRequest::delete(&uri)
        .auth(&kalle)
        .send(router.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let still_there: FollowerResponse = AxumTestRequest::get(&uri)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(still_there.owner, "anna");
    AxumTestRequest::delete(&uri)
        .auth(&anna)
        .send(router)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
