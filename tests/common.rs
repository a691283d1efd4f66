// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, users, tokens and catalog data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `cookbook_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use cookbook_server::{
    auth::{generate_token_key, hash_password},
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    models::{Ingredient, IngredientAmount, NewIngredient, NewRecipe, NewUser, Recipe, User},
    resources::ServerResources,
};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Password given to every test user
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// 1x1 transparent GIF as a data URI
pub const TEST_IMAGE: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup: migrated in-memory `SQLite`
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new(&DatabaseUrl::Memory).await?;
    database.migrate().await?;
    Ok(Arc::new(database))
}

/// Server resources over a fresh database and a temporary media root
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, TempDir)> {
    init_test_logging();
    let media_root = tempfile::tempdir()?;
    let config = ServerConfig::for_testing(media_root.path().to_path_buf());

    let resources = ServerResources::from_config(config).await?;
    resources.database.migrate().await?;
    Ok((Arc::new(resources), media_root))
}

/// Create a user named `username` with [`TEST_PASSWORD`]
pub async fn create_test_user(database: &Database, username: &str) -> Result<User> {
    let password_hash = hash_password(TEST_PASSWORD, 4).await?;
    let user = database
        .users()
        .create(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "Cook".to_owned(),
            password_hash,
        })
        .await?;
    Ok(user)
}

/// Create a user and return it with an `Authorization` header value
pub async fn create_authenticated_user(
    database: &Database,
    username: &str,
) -> Result<(User, String)> {
    let user = create_test_user(database, username).await?;
    let key = database
        .tokens()
        .get_or_create(user.id, &generate_token_key())
        .await?;
    Ok((user, format!("Token {key}")))
}

/// Insert a catalog ingredient
pub async fn create_ingredient(database: &Database, name: &str, unit: &str) -> Result<Ingredient> {
    let ingredient = database
        .ingredients()
        .create(&NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await?;
    Ok(ingredient)
}

/// Insert a recipe directly, bypassing image storage
pub async fn create_recipe(
    database: &Database,
    author: &User,
    name: &str,
    lines: &[(i64, i64)],
) -> Result<Recipe> {
    let recipe = database
        .recipes()
        .create(
            author.id,
            &NewRecipe {
                name: name.to_owned(),
                text: format!("How to make {name}"),
                cooking_time: 10,
                image: "recipes/images/test.gif".to_owned(),
                ingredients: lines
                    .iter()
                    .map(|&(id, amount)| IngredientAmount { id, amount })
                    .collect(),
            },
        )
        .await?;
    Ok(recipe)
}
