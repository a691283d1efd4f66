// ABOUTME: Shopping list aggregation over the user's cart
// ABOUTME: Sums ingredient amounts across cart recipes grouped by ingredient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{ShoppingList, ShoppingListItem};

/// Shopping list database operations manager
pub struct ShoppingListManager {
    pool: SqlitePool,
}

impl ShoppingListManager {
    /// Create a new shopping list manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Aggregate the user's cart
    ///
    /// An empty cart yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn build(&self, user_id: i64) -> AppResult<ShoppingList> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.id, i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate shopping list: {e}")))?;

        let items = rows
            .iter()
            .map(|row| -> AppResult<ShoppingListItem> {
                Ok(ShoppingListItem {
                    name: row.try_get("name")?,
                    measurement_unit: row.try_get("measurement_unit")?,
                    total_amount: row.try_get("total_amount")?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let recipes: Vec<String> = sqlx::query_scalar(
            r"
            SELECT DISTINCT r.name
            FROM shopping_cart sc
            JOIN recipes r ON r.id = sc.recipe_id
            WHERE sc.user_id = $1
            ORDER BY r.name
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cart recipes: {e}")))?;

        Ok(ShoppingList { items, recipes })
    }
}
