// ABOUTME: Criterion benchmarks for SQLite-backed recipe and profile queries
// ABOUTME: Measures list pages with derived counts, search across joins, and relationship inserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Criterion benchmarks for database operations.
//!
//! Seeds an in-memory database once per group, then measures the list
//! queries that compute counts with correlated subqueries.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tasty_treats_server::config::DatabaseUrl;
use tasty_treats_server::database::{
    Database, ProfileFilter, ProfileOrdering, RecipeOrdering, RecipeQuery,
};
use tasty_treats_server::models::{
    IngredientName, MeasurementName, Principal, Recipe, RecipeStatus, User,
};
use tasty_treats_server::pagination::PageRequest;
use tasty_treats_server::permissions::RecipeVisibility;
use tokio::runtime::Runtime;

static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);

async fn create_bench_user(db: &Database) -> User {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    db.users()
        .create_user(&format!("bench_user_{counter}"), None, "benchmark_hash_value")
        .await
        .unwrap()
}

/// In-memory database with `users` users, each owning `recipes_per_user` published recipes
async fn seeded_db(users: usize, recipes_per_user: usize) -> (Database, Vec<User>) {
    let db = Database::new(&DatabaseUrl::Memory, 1).await.unwrap();
    let mut created = Vec::with_capacity(users);
    for _ in 0..users {
        created.push(create_bench_user(&db).await);
    }

    let salt = IngredientName::parse("Salt").unwrap();
    let pinch = MeasurementName::parse("pinch").unwrap();
    for (index, owner) in created.iter().enumerate() {
        for n in 0..recipes_per_user {
            let mut recipe = Recipe::new(owner.id, format!("Recipe {index}-{n}"));
            recipe.status = RecipeStatus::Published;
            let recipe_id = db.recipes().create_recipe(&recipe).await.unwrap();
            db.recipe_ingredients()
                .create_recipe_ingredient(recipe_id, &salt, "1", &pinch)
                .await
                .unwrap();
        }
        if let Some(next) = created.get((index + 1) % created.len()) {
            if next.id != owner.id {
                db.followers().create_follower(owner.id, next.id).await.unwrap();
            }
        }
    }
    (db, created)
}

fn bench_recipe_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("database_recipe_list");

    for size in [10_usize, 50] {
        let (db, users) = rt.block_on(seeded_db(size, 5));
        let viewer = Principal::user(users[0].id, users[0].username.clone());

        group.bench_with_input(BenchmarkId::new("anonymous_first_page", size), &size, |b, _| {
            let query =
                RecipeQuery::visible_to(RecipeVisibility::for_principal(&Principal::Anonymous));
            b.iter(|| {
                rt.block_on(db.recipes().list_recipes(
                    black_box(&query),
                    PageRequest::default(),
                    None,
                ))
                .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("by_likes_as_user", size), &size, |b, _| {
            let mut query = RecipeQuery::visible_to(RecipeVisibility::for_principal(&viewer));
            query.ordering = RecipeOrdering::LikesCount { descending: true };
            b.iter(|| {
                rt.block_on(db.recipes().list_recipes(
                    black_box(&query),
                    PageRequest::default(),
                    viewer.user_id(),
                ))
                .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("search_ingredient", size), &size, |b, _| {
            let mut query =
                RecipeQuery::visible_to(RecipeVisibility::for_principal(&Principal::Anonymous));
            query.search = Some("salt".to_owned());
            b.iter(|| {
                rt.block_on(db.recipes().list_recipes(
                    black_box(&query),
                    PageRequest::default(),
                    None,
                ))
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_profile_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("database_profile_list");
    let (db, _users) = rt.block_on(seeded_db(50, 2));

    group.bench_function("by_followers_count", |b| {
        b.iter(|| {
            rt.block_on(db.profiles().list_profiles(
                ProfileFilter::default(),
                black_box(ProfileOrdering::FollowersCount { descending: true }),
                PageRequest::default(),
                None,
            ))
            .unwrap()
        });
    });

    group.finish();
}

fn bench_relationship_insert(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("database_relationship_insert");
    let (db, users) = rt.block_on(seeded_db(2, 1));
    let recipe_id = rt
        .block_on(db.recipes().list_recipes(
            &RecipeQuery::visible_to(RecipeVisibility::for_principal(&Principal::Anonymous)),
            PageRequest::default(),
            None,
        ))
        .unwrap()
        .0[0]
        .recipe
        .id;

    group.bench_function("like_then_unlike", |b| {
        b.iter(|| {
            rt.block_on(async {
                let like = db.likes().create_like(users[0].id, recipe_id).await.unwrap();
                db.likes().delete_like(black_box(like.id)).await.unwrap()
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_recipe_list,
    bench_profile_list,
    bench_relationship_insert
);
criterion_main!(benches);
