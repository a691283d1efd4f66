// ABOUTME: SQLite connection pool, schema creation and per-table managers
// ABOUTME: Database hands out lightweight managers that share one SqlitePool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Database Management
//!
//! One [`Database`] per process owns the connection pool and creates the
//! schema idempotently at startup. Queries live in one manager per table
//! family; managers are cheap to construct and clone the pool handle.

/// Favorites and shopping cart membership
pub mod collections;
/// Ingredient catalog
pub mod ingredients;
/// Recipes and their ingredient lines
pub mod recipes;
/// Shopping list aggregation over the cart
pub mod shopping_list;
/// Author subscriptions
pub mod subscriptions;
/// Auth token storage
pub mod tokens;
/// User accounts
pub mod users;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

pub use collections::CollectionsManager;
pub use ingredients::IngredientsManager;
pub use recipes::RecipesManager;
pub use shopping_list::ShoppingListManager;
pub use subscriptions::SubscriptionsManager;
pub use tokens::TokensManager;
pub use users::UsersManager;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Upper bound on pooled connections for file databases
const MAX_CONNECTIONS: u32 = 10;

/// Schema statements, applied in order
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        avatar TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS auth_tokens (
        key TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        measurement_unit TEXT NOT NULL,
        UNIQUE (name, measurement_unit)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        image TEXT NOT NULL,
        text TEXT NOT NULL,
        cooking_time INTEGER NOT NULL CHECK (cooking_time BETWEEN 1 AND 32767),
        published_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_published ON recipes(published_at DESC, id DESC)",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 2147483647),
        UNIQUE (recipe_id, ingredient_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        UNIQUE (user_id, recipe_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS shopping_cart (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        UNIQUE (user_id, recipe_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (user_id, author_id),
        CHECK (user_id <> author_id)
    )
    ",
];

/// Process-wide database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and create the schema
    ///
    /// In-memory databases are held on a single connection that never
    /// expires, so every query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the schema creation fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL '{url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            if let DatabaseUrl::SQLite { path } = url {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(database)
    }

    /// Create every table and index that does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        }
        debug!(statements = SCHEMA.len(), "Schema applied");
        Ok(())
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check the connection with a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Auth tokens
    #[must_use]
    pub fn tokens(&self) -> TokensManager {
        TokensManager::new(self.pool.clone())
    }

    /// Ingredient catalog
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Recipes
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Favorites and shopping cart
    #[must_use]
    pub fn collections(&self) -> CollectionsManager {
        CollectionsManager::new(self.pool.clone())
    }

    /// Subscriptions
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionsManager {
        SubscriptionsManager::new(self.pool.clone())
    }

    /// Shopping list aggregation
    #[must_use]
    pub fn shopping_list(&self) -> ShoppingListManager {
        ShoppingListManager::new(self.pool.clone())
    }
}

/// Format a timestamp for storage; fixed width so text order is time order
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
///
/// # Errors
///
/// Returns an error if the column does not hold an RFC 3339 timestamp
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid stored timestamp '{value}': {e}")))
}

/// Whether an sqlx error is a unique constraint violation
#[must_use]
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
}
