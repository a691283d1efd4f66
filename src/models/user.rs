// ABOUTME: User account model
// ABOUTME: Holds profile fields, the bcrypt password hash and the stored avatar path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use chrono::{DateTime, Utc};

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique email, used as the login name
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Avatar path relative to the media root
    pub avatar: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Validated registration data with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique email
    pub email: String,
    /// Unique username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash
    pub password_hash: String,
}
