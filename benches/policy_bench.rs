// ABOUTME: Criterion benchmarks for the access policy layer
// ABOUTME: Measures visibility checks, SQL filter rendering, ownership guards, and input parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Criterion benchmarks for the pure policy functions.
//!
//! These run on every request, so they should stay in the nanosecond range.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tasty_treats_server::models::{IngredientName, Principal, Recipe, RecipeStatus};
use tasty_treats_server::permissions::{check_object_permission, RecipeVisibility, RequestIntent};

const OWNER: i64 = 1;
const OTHER: i64 = 2;

fn bench_visibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_visibility");

    let anonymous = RecipeVisibility::for_principal(&Principal::Anonymous);
    let owner = RecipeVisibility::for_principal(&Principal::user(OWNER, "owner"))
        .with_statuses(RecipeStatus::ALL.to_vec());

    group.bench_function("allows_anonymous", |b| {
        b.iter(|| {
            for status in RecipeStatus::ALL {
                black_box(anonymous.allows(black_box(OWNER), status));
            }
        });
    });

    group.bench_function("allows_owner_with_statuses", |b| {
        b.iter(|| {
            for status in RecipeStatus::ALL {
                black_box(owner.allows(black_box(OTHER), status));
            }
        });
    });

    group.bench_function("sql_filter_render", |b| {
        b.iter(|| black_box(owner.sql_filter("r.owner_id", "r.status").to_sql()));
    });

    group.finish();
}

fn bench_ownership(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_ownership");
    let recipe = Recipe::new(OWNER, "Pancakes".to_owned());
    let owner = Principal::user(OWNER, "owner");
    let stranger = Principal::user(OTHER, "stranger");

    group.bench_function("write_by_owner", |b| {
        b.iter(|| check_object_permission(black_box(&owner), &recipe, RequestIntent::Write));
    });
    group.bench_function("write_by_stranger", |b| {
        b.iter(|| check_object_permission(black_box(&stranger), &recipe, RequestIntent::Write));
    });
    group.bench_function("intent_from_method", |b| {
        b.iter(|| RequestIntent::from_method(black_box("PATCH")));
    });

    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_parsing");

    group.bench_function("status_list", |b| {
        b.iter(|| RecipeStatus::parse_list(black_box("pending_publish,published")).unwrap());
    });
    group.bench_function("ingredient_name", |b| {
        b.iter(|| IngredientName::parse(black_box("  Rye flour  ")).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_visibility, bench_ownership, bench_parsing);
criterion_main!(benches);
