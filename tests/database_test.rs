// ABOUTME: Storage-level tests for the SQLite managers
// ABOUTME: Covers cascade deletes, constraint classification, and visibility parity between SQL and memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::create_test_database;
use tasty_treats_server::config::DatabaseUrl;
use tasty_treats_server::database::{Database, FollowerFilter, RecipeQuery};
use tasty_treats_server::errors::DatabaseError;
use tasty_treats_server::models::{Comment, Principal, Recipe, RecipeStatus, User};
use tasty_treats_server::pagination::PageRequest;
use tasty_treats_server::permissions::RecipeVisibility;

async fn user(db: &Database, username: &str) -> User {
    db.users()
        .create_user(username, None, "not-a-real-hash")
        .await
        .unwrap()
}

async fn recipe(db: &Database, owner: &User, name: &str, status: RecipeStatus) -> i64 {
    let mut recipe = Recipe::new(owner.id, name.to_owned());
    recipe.status = status;
    db.recipes().create_recipe(&recipe).await.unwrap()
}

#[tokio::test]
async fn test_create_user_creates_profile() {
    let db = create_test_database().await.unwrap();
    let kalle = user(&db, "kalle").await;

    let profile = db.profiles().get_profile_by_owner(kalle.id).await.unwrap().unwrap();
    assert_eq!(profile.owner_id, kalle.id);
    assert_eq!(profile.image, "images/default_profile.jpg");
}

#[tokio::test]
async fn test_duplicate_username_is_a_validation_error() {
    let db = create_test_database().await.unwrap();
    user(&db, "kalle").await;

    let err = db
        .users()
        .create_user("kalle", None, "another-hash")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("A user with that username already exists."));
}

#[tokio::test]
async fn test_deleting_user_cascades_to_owned_rows() {
    let db = create_test_database().await.unwrap();
    let kalle = user(&db, "kalle").await;
    let anna = user(&db, "anna").await;

    let kalles = recipe(&db, &kalle, "Pancakes", RecipeStatus::Published).await;
    let annas = recipe(&db, &anna, "Soup", RecipeStatus::Published).await;
    db.likes().create_like(kalle.id, annas).await.unwrap();
    db.likes().create_like(anna.id, kalles).await.unwrap();
    db.comments()
        .create_comment(&Comment::new(anna.id, kalles, "Yum".to_owned()))
        .await
        .unwrap();
    db.followers().create_follower(anna.id, kalle.id).await.unwrap();

    assert!(db.users().delete_user(kalle.id).await.unwrap());
    let as_anna = RecipeVisibility::for_viewer(Some(anna.id));

    assert!(db.recipes().get_recipe(kalles).await.unwrap().is_none());
    assert!(db.profiles().get_profile_by_owner(kalle.id).await.unwrap().is_none());

    let (likes, like_count) = db
        .likes()
        .list_likes(&as_anna, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(like_count, 0, "likes by and on kalle's recipes are gone: {likes:?}");
    let (_, comment_count) = db
        .comments()
        .list_comments(None, &as_anna, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(comment_count, 0);
    let (_, follow_count) = db
        .followers()
        .list_followers(FollowerFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(follow_count, 0);

    assert!(db.recipes().get_recipe(annas).await.unwrap().is_some());
    assert!(!db.users().delete_user(kalle.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_constraints_are_classified() {
    let db = create_test_database().await.unwrap();
    let kalle = user(&db, "kalle").await;
    let anna = user(&db, "anna").await;

    db.followers().create_follower(anna.id, kalle.id).await.unwrap();
    let duplicate = db.followers().create_follower(anna.id, kalle.id).await.unwrap_err();
    assert!(matches!(duplicate, DatabaseError::UniqueViolation(_)));

    let own = db.followers().create_follower(anna.id, anna.id).await.unwrap_err();
    assert!(matches!(own, DatabaseError::CheckViolation(_)));

    let missing = db.followers().create_follower(anna.id, 4242).await.unwrap_err();
    assert!(matches!(missing, DatabaseError::ForeignKeyViolation(_)));
}

#[tokio::test]
async fn test_duplicate_like_is_unique_violation() {
    let db = create_test_database().await.unwrap();
    let kalle = user(&db, "kalle").await;
    let id = recipe(&db, &kalle, "Pancakes", RecipeStatus::Published).await;

    db.likes().create_like(kalle.id, id).await.unwrap();
    let err = db.likes().create_like(kalle.id, id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation(_)));
}

#[tokio::test]
async fn test_sql_visibility_matches_in_memory_rule() {
    let db = create_test_database().await.unwrap();
    let kalle = user(&db, "kalle").await;
    let anna = user(&db, "anna").await;

    let mut stored = Vec::new();
    for owner in [&kalle, &anna] {
        for status in RecipeStatus::ALL {
            let id = recipe(&db, owner, status.as_str(), status).await;
            stored.push((id, owner.id, status));
        }
    }

    let principals = [
        Principal::Anonymous,
        Principal::user(kalle.id, "kalle"),
        Principal::user(anna.id, "anna"),
    ];
    let filters = [
        Vec::new(),
        vec![RecipeStatus::Published],
        vec![RecipeStatus::PendingPublish, RecipeStatus::PendingDelete],
    ];

    for principal in &principals {
        for statuses in &filters {
            let rule = RecipeVisibility::for_principal(principal).with_statuses(statuses.clone());
            let mut expected: Vec<i64> = stored
                .iter()
                .filter(|(_, owner, status)| rule.allows(*owner, *status))
                .map(|(id, _, _)| *id)
                .collect();
            expected.sort_unstable();

            let (views, total) = db
                .recipes()
                .list_recipes(
                    &RecipeQuery::visible_to(rule.clone()),
                    PageRequest::default(),
                    principal.user_id(),
                )
                .await
                .unwrap();
            let mut listed: Vec<i64> = views.iter().map(|v| v.recipe.id).collect();
            listed.sort_unstable();

            assert_eq!(listed, expected, "{principal:?} with {statuses:?}");
            assert_eq!(total, i64::try_from(expected.len()).unwrap());
        }
    }
}

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("tasty.db"),
    };

    {
        let db = Database::new(&url, 2).await.unwrap();
        let kalle = user(&db, "kalle").await;
        recipe(&db, &kalle, "Pancakes", RecipeStatus::Published).await;
        db.pool().close().await;
    }

    let reopened = Database::new(&url, 2).await.unwrap();
    let kalle = reopened
        .users()
        .get_user_by_username("kalle")
        .await
        .unwrap()
        .expect("user survives reopen");
    let query = RecipeQuery::visible_to(RecipeVisibility::for_principal(&Principal::Anonymous));
    let (_, total) = reopened
        .recipes()
        .list_recipes(&query, PageRequest::default(), Some(kalle.id))
        .await
        .unwrap();
    assert_eq!(total, 1);
}
