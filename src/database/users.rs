// ABOUTME: Database operations for user accounts
// ABOUTME: Registration, lookups, paginated listing, password and avatar updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use chrono::{SubsecRound, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{format_timestamp, is_unique_violation, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::pagination::PageRequest;

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, avatar, created_at";

/// User database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email or username is taken
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        let created_at = Utc::now().trunc_subsecs(6);
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("A user with that email or username already exists")
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password_hash.clone(),
            avatar: None,
            created_at,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user {user_id}: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email, compared case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Whether the email is already registered
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn email_taken(&self, email: &str) -> AppResult<bool> {
        self.exists("SELECT 1 FROM users WHERE email = $1 COLLATE NOCASE", email)
            .await
    }

    /// Whether the username is already registered
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn username_taken(&self, username: &str) -> AppResult<bool> {
        self.exists("SELECT 1 FROM users WHERE username = $1", username)
            .await
    }

    async fn exists(&self, query: &str, value: &str) -> AppResult<bool> {
        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check user uniqueness: {e}")))?;
        Ok(row.is_some())
    }

    /// One page of users ordered by username, plus the total count
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, page: &PageRequest) -> AppResult<(Vec<User>, u64)> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username, id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, total.unsigned_abs()))
    }

    /// Replace the password hash
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;
        Ok(())
    }

    /// Set or clear the avatar, returning the previous path
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails
    pub async fn set_avatar(&self, user_id: i64, avatar: Option<&str>) -> AppResult<Option<String>> {
        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT avatar FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to read avatar: {e}")))?;
        let Some(previous) = previous else {
            return Err(AppError::not_found(format!("User {user_id}")));
        };

        sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update avatar: {e}")))?;

        Ok(previous)
    }
}

/// Convert a `users` row
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to read user row: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        password_hash: row.try_get("password_hash")?,
        avatar: row.try_get("avatar")?,
        created_at: parse_timestamp(&created_at)?,
    })
}
