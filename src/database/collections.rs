// ABOUTME: Database operations for favorites and shopping cart membership
// ABOUTME: Both collections are (user, recipe) join tables with a unique pair constraint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use sqlx::SqlitePool;

use super::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::RecipeCollection;

/// Favorites/cart database operations manager
pub struct CollectionsManager {
    pool: SqlitePool,
}

impl CollectionsManager {
    /// Create a new collections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to the user's collection
    ///
    /// The unique constraint decides duplicates, so two concurrent adds
    /// cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the recipe is already present
    pub async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Recipe is already in {}", collection.label()))
                    .with_resource_id(recipe_id.to_string())
            } else {
                AppError::database(format!("Failed to add recipe to {}: {e}", collection.table()))
            }
        })?;
        Ok(())
    }

    /// Remove a recipe from the user's collection; false if it was absent
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!(
                "Failed to remove recipe from {}: {e}",
                collection.table()
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the recipe is in the user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn contains(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let row = sqlx::query(&format!(
            "SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to check {}: {e}", collection.table()))
        })?;

        Ok(row.is_some())
    }
}
