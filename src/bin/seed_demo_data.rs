// ABOUTME: Demo data seeder for the Tasty Treats recipe API
// ABOUTME: Creates users, recipes with ingredient lines, comments, likes, and follows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Demo data seeder.
//!
//! Usage:
//! ```bash
//! # Seed the database configured through DATABASE_URL
//! cargo run --bin seed-demo-data
//!
//! # Seed a specific file with a fixed random seed
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/demo.db --seed 7
//! ```
//!
//! Every demo user logs in with the password `DemoUser123!`. Users that
//! already exist are reused, so the seeder can be run more than once.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tasty_treats_server::auth::AuthManager;
use tasty_treats_server::config::{DatabaseUrl, ServerConfig};
use tasty_treats_server::database::Database;
use tasty_treats_server::logging;
use tasty_treats_server::models::{
    Comment, IngredientName, MeasurementName, Recipe, RecipeStatus, User,
};
use tracing::info;

/// Password shared by every demo user
const DEMO_USER_PASSWORD: &str = "DemoUser123!";

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Tasty Treats Demo Data Seeder",
    long_about = "Populate the database with demo users, recipes, and social activity"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Random seed for likes, follows, and comments
    #[arg(long, default_value = "42")]
    seed: u64,
}

struct DemoRecipe {
    name: &'static str,
    intro: &'static str,
    instruction: &'static str,
    status: RecipeStatus,
    ingredients: &'static [(&'static str, &'static str, &'static str)],
}

const DEMO_USERS: [&str; 4] = ["kalle", "anna", "mikko", "sofia"];

const DEMO_RECIPES: [DemoRecipe; 6] = [
    DemoRecipe {
        name: "Cinnamon Buns",
        intro: "Soft Finnish korvapuusti.",
        instruction: "Knead, roll with butter and cinnamon, fold, bake at 225C.",
        status: RecipeStatus::Published,
        ingredients: &[("Flour", "800", "g"), ("Milk", "5", "dl"), ("Cinnamon", "2", "tbsp")],
    },
    DemoRecipe {
        name: "Blueberry Pie",
        intro: "Mustikkapiirakka for late summer.",
        instruction: "Press the dough into a pan, add berries and custard, bake 30 min.",
        status: RecipeStatus::Published,
        ingredients: &[("Blueberries", "300", "g"), ("Flour", "3", "dl"), ("Sugar", "1", "dl")],
    },
    DemoRecipe {
        name: "Rye Bread",
        intro: "Dense sourdough loaf.",
        instruction: "Feed the starter overnight, mix, proof, bake long and low.",
        status: RecipeStatus::PendingPublish,
        ingredients: &[("Rye flour", "1", "kg"), ("Salt", "1", "tbsp")],
    },
    DemoRecipe {
        name: "Salmon Soup",
        intro: "Lohikeitto with dill.",
        instruction: "Simmer potatoes, add salmon and cream, finish with dill.",
        status: RecipeStatus::Published,
        ingredients: &[("Salmon", "400", "g"), ("Cream", "2", "dl"), ("Salt", "1", "tsp")],
    },
    DemoRecipe {
        name: "Karelian Pies",
        intro: "Rice pasties with egg butter.",
        instruction: "Roll thin rye crusts, fill with rice porridge, crimp, bake hot.",
        status: RecipeStatus::Published,
        ingredients: &[("Rye flour", "3", "dl"), ("Rice", "2", "dl"), ("Milk", "1", "l")],
    },
    DemoRecipe {
        name: "Old Meatballs",
        intro: "Retired recipe.",
        instruction: "Mix, shape, fry.",
        status: RecipeStatus::PendingDelete,
        ingredients: &[("Minced meat", "500", "g"), ("Salt", "1", "tsp")],
    },
];

const DEMO_COMMENTS: [&str; 5] = [
    "Made this on Sunday, came out great!",
    "Less sugar next time for me.",
    "My kids loved it.",
    "Can I use oat milk instead?",
    "Classic. Thanks for sharing.",
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url)?;
    }

    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    let auth = AuthManager::new(&config.auth);
    let mut rng = StdRng::seed_from_u64(args.seed);

    info!("Seeding demo data into {}", config.database.url);

    let users = seed_users(&database, &auth).await?;
    let recipe_ids = seed_recipes(&database, &users).await?;
    let published: Vec<i64> = recipe_ids
        .iter()
        .filter(|(_, status)| status.is_public())
        .map(|(id, _)| *id)
        .collect();

    let likes = seed_likes(&database, &users, &published, &mut rng).await?;
    let comments = seed_comments(&database, &users, &published, &mut rng).await?;
    let follows = seed_follows(&database, &users, &mut rng).await?;

    info!(
        users = users.len(),
        recipes = recipe_ids.len(),
        likes,
        comments,
        follows,
        "Demo data ready; log in with password {DEMO_USER_PASSWORD}"
    );
    Ok(())
}

async fn seed_users(database: &Database, auth: &AuthManager) -> Result<Vec<User>> {
    let manager = database.users();
    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for username in DEMO_USERS {
        let user = if let Some(existing) = manager.get_user_by_username(username).await? {
            info!("Reusing user {username}");
            existing
        } else {
            let hash = auth.hash_password(DEMO_USER_PASSWORD).await?;
            let email = format!("{username}@example.com");
            manager.create_user(username, Some(&email), &hash).await?
        };
        users.push(user);
    }
    Ok(users)
}

async fn seed_recipes(database: &Database, users: &[User]) -> Result<Vec<(i64, RecipeStatus)>> {
    let recipes = database.recipes();
    let lines = database.recipe_ingredients();
    let mut ids = Vec::with_capacity(DEMO_RECIPES.len());

    for (index, demo) in DEMO_RECIPES.iter().enumerate() {
        let owner = &users[index % users.len()];
        let mut recipe = Recipe::new(owner.id, demo.name.to_owned());
        demo.intro.clone_into(&mut recipe.intro);
        demo.instruction.clone_into(&mut recipe.instruction);
        recipe.status = demo.status;

        let id = recipes.create_recipe(&recipe).await?;
        for (ingredient, quantity, measure) in demo.ingredients {
            lines
                .create_recipe_ingredient(
                    id,
                    &IngredientName::parse(*ingredient)?,
                    quantity,
                    &MeasurementName::parse(*measure)?,
                )
                .await?;
        }
        ids.push((id, demo.status));
    }
    Ok(ids)
}

async fn seed_likes(
    database: &Database,
    users: &[User],
    recipes: &[i64],
    rng: &mut StdRng,
) -> Result<usize> {
    let likes = database.likes();
    let mut created = 0;
    for user in users {
        for recipe_id in recipes {
            if rng.gen_bool(0.5) && likes.create_like(user.id, *recipe_id).await.is_ok() {
                created += 1;
            }
        }
    }
    Ok(created)
}

async fn seed_comments(
    database: &Database,
    users: &[User],
    recipes: &[i64],
    rng: &mut StdRng,
) -> Result<usize> {
    let comments = database.comments();
    let mut created = 0;
    for recipe_id in recipes {
        let count = rng.gen_range(0..=3);
        for _ in 0..count {
            let (Some(author), Some(text)) = (users.choose(rng), DEMO_COMMENTS.choose(rng)) else {
                continue;
            };
            let comment = Comment::new(author.id, *recipe_id, (*text).to_owned());
            comments.create_comment(&comment).await?;
            created += 1;
        }
    }
    Ok(created)
}

async fn seed_follows(database: &Database, users: &[User], rng: &mut StdRng) -> Result<usize> {
    let followers = database.followers();
    let mut created = 0;
    for owner in users {
        for followed in users.iter().filter(|u| u.id != owner.id) {
            if rng.gen_bool(0.6) && followers.create_follower(owner.id, followed.id).await.is_ok() {
                created += 1;
            }
        }
    }
    Ok(created)
}
