// ABOUTME: Database operations for recipes and their ingredient lines
// ABOUTME: Transactional create/update with full line replacement and filtered listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use chrono::{SubsecRound, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use super::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::{
    IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeIngredientLine,
};
use crate::pagination::PageRequest;

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.published_at";

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a recipe and its ingredient lines in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case
    pub async fn create(&self, author_id: i64, recipe: &NewRecipe) -> AppResult<Recipe> {
        let published_at = Utc::now().trunc_subsecs(6);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id)
        .bind(&recipe.name)
        .bind(&recipe.image)
        .bind(&recipe.text)
        .bind(recipe.cooking_time)
        .bind(format_timestamp(published_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;
        let recipe_id = result.last_insert_rowid();

        insert_lines(&mut tx, recipe_id, &recipe.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        Ok(Recipe {
            id: recipe_id,
            author_id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            published_at,
        })
    }

    /// Apply changes and replace every ingredient line in one transaction
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist, or a database
    /// error; the stored recipe is untouched on failure
    pub async fn update(&self, recipe_id: i64, changes: &RecipeChanges) -> AppResult<Recipe> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                name = COALESCE($1, name),
                text = COALESCE($2, text),
                cooking_time = COALESCE($3, cooking_time),
                image = COALESCE($4, image)
            WHERE id = $5
            ",
        )
        .bind(&changes.name)
        .bind(&changes.text)
        .bind(changes.cooking_time)
        .bind(&changes.image)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe {recipe_id}: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe lines: {e}")))?;
        insert_lines(&mut tx, recipe_id, &changes.ingredients).await?;

        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to reload recipe: {e}")))?;
        let recipe = row_to_recipe(&row)?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;
        Ok(recipe)
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe {recipe_id}: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// Delete a recipe; lines, favorites and cart entries cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe {recipe_id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Ingredient lines of a recipe in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn ingredients(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe ingredients: {e}")))?;

        rows.iter()
            .map(|row| -> AppResult<RecipeIngredientLine> {
                Ok(RecipeIngredientLine {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    measurement_unit: row.try_get("measurement_unit")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }

    /// One page of recipes, newest first, plus the total matching count
    ///
    /// Collection filters are applied only when `viewer_id` is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        viewer_id: Option<i64>,
        page: &PageRequest,
    ) -> AppResult<(Vec<Recipe>, u64)> {
        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM recipes r WHERE 1 = 1");
        push_filters(&mut count_query, filter, viewer_id);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE 1 = 1"));
        push_filters(&mut query, filter, viewer_id);
        query.push(" ORDER BY r.published_at DESC, r.id DESC LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows.iter().map(row_to_recipe).collect::<AppResult<Vec<_>>>()?;
        Ok((recipes, total.unsigned_abs()))
    }

    /// An author's recipes, newest first, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_by_author(&self, author_id: i64, limit: Option<u32>) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {RECIPE_COLUMNS} FROM recipes r
            WHERE r.author_id = $1
            ORDER BY r.published_at DESC, r.id DESC
            LIMIT $2
            "
        ))
        .bind(author_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Number of recipes an author has published
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_by_author(&self, author_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;
        Ok(count.unsigned_abs())
    }
}

/// Append `WHERE` clauses for the list filters to a query over `recipes r`
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter, viewer_id: Option<i64>) {
    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ");
        builder.push_bind(author);
    }
    if let Some(name) = &filter.name {
        builder.push(" AND r.name = ");
        builder.push_bind(name.clone());
    }

    let Some(viewer_id) = viewer_id else {
        return;
    };
    for (collection, wanted) in filter.collection_filters() {
        let Some(wanted) = wanted else {
            continue;
        };
        builder.push(if wanted { " AND EXISTS " } else { " AND NOT EXISTS " });
        builder.push(format!(
            "(SELECT 1 FROM {} c WHERE c.recipe_id = r.id AND c.user_id = ",
            collection.table()
        ));
        builder.push_bind(viewer_id);
        builder.push(")");
    }
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    lines: &[IngredientAmount],
) -> AppResult<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
    builder.push_values(lines, |mut row, line| {
        row.push_bind(recipe_id)
            .push_bind(line.id)
            .push_bind(line.amount);
    });

    builder.build().execute(conn).await.map_err(|e| {
        AppError::database(format!("Failed to insert ingredient lines for recipe {recipe_id}: {e}"))
    })?;
    Ok(())
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let published_at: String = row.try_get("published_at")?;

    Ok(Recipe {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        name: row.try_get("name")?,
        image: row.try_get("image")?,
        text: row.try_get("text")?,
        cooking_time: row.try_get("cooking_time")?,
        published_at: parse_timestamp(&published_at)?,
    })
}
