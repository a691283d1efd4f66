// ABOUTME: Database operations for the ingredient catalog
// ABOUTME: Name search with prefix matches first, existence checks and bulk import
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NewIngredient};

/// Ingredient database operations manager
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Search the catalog by name
    ///
    /// Matching is case-insensitive for any script, so it runs over the
    /// name-ordered catalog in Rust rather than with SQLite's ASCII-only
    /// `LOWER`. Names starting with `query` come first, then names that
    /// contain it elsewhere. Without a query the whole catalog is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn search(&self, query: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;
        let all = rows
            .iter()
            .map(row_to_ingredient)
            .collect::<AppResult<Vec<_>>>()?;

        let needle = match query.map(str::trim) {
            Some(needle) if !needle.is_empty() => needle.to_lowercase(),
            _ => return Ok(all),
        };

        let (mut prefixed, mut contained) = (Vec::new(), Vec::new());
        for ingredient in all {
            let name = ingredient.name.to_lowercase();
            if name.starts_with(&needle) {
                prefixed.push(ingredient);
            } else if name.contains(&needle) {
                contained.push(ingredient);
            }
        }
        prefixed.append(&mut contained);
        Ok(prefixed)
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, ingredient_id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to get ingredient {ingredient_id}: {e}"))
            })?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// The subset of `ids` that exist in the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn existing_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id FROM ingredients WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check ingredients: {e}")))
    }

    /// Insert one ingredient
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the (name, unit) pair exists
    pub async fn create(&self, ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let result =
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(&ingredient.name)
                .bind(&ingredient.measurement_unit)
                .execute(&self.pool)
                .await?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        })
    }

    /// Bulk insert, skipping (name, unit) pairs already in the catalog
    ///
    /// Returns the number of rows actually added.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails
    pub async fn insert_ignoring_conflicts(&self, ingredients: &[NewIngredient]) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin import: {e}")))?;

        let mut added = 0;
        for ingredient in ingredients {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO ingredients (name, measurement_unit) VALUES ($1, $2)",
            )
            .bind(&ingredient.name)
            .bind(&ingredient.measurement_unit)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to import ingredient: {e}")))?;
            added += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit import: {e}")))?;
        Ok(added)
    }
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    Ok(Ingredient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        measurement_unit: row.try_get("measurement_unit")?,
    })
}
