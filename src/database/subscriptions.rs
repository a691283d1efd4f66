// ABOUTME: Database operations for author subscriptions
// ABOUTME: Follow/unfollow pairs and the paginated list of followed authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use sqlx::SqlitePool;

use super::is_unique_violation;
use super::users::row_to_user;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::pagination::PageRequest;

/// Subscription database operations manager
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe `user_id` to `author_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` for a repeated subscription and
    /// `InvalidInput` when the CHECK constraint rejects a self-subscription
    pub async fn add(&self, user_id: i64, author_id: i64) -> AppResult<()> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists("You are already subscribed to this author")
                        .with_resource_id(author_id.to_string())
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    /// Remove a subscription; false if there was none
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn remove(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove subscription: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn is_subscribed(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        Ok(row.is_some())
    }

    /// One page of followed authors in subscription order, plus the total
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_authors(&self, user_id: i64, page: &PageRequest) -> AppResult<(Vec<User>, u64)> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.avatar, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let authors = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((authors, total.unsigned_abs()))
    }
}
