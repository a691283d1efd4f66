// ABOUTME: Database operations for API auth tokens
// ABOUTME: One token per user, created on first login and removed on logout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use chrono::Utc;
use sqlx::SqlitePool;

use super::format_timestamp;
use super::users::row_to_user;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Auth token database operations manager
pub struct TokensManager {
    pool: SqlitePool,
}

impl TokensManager {
    /// Create a new tokens manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the user's token, storing `candidate` if they have none yet
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_or_create(&self, user_id: i64, candidate: &str) -> AppResult<String> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (key, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(candidate)
        .bind(user_id)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store auth token: {e}")))?;

        sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read auth token: {e}")))
    }

    /// Resolve a token key to its user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn user_for_token(&self, key: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.avatar, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to resolve auth token: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Delete the user's token; false if they had none
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn revoke(&self, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to revoke auth token: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
