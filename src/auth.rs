// ABOUTME: Token authentication and password hashing
// ABOUTME: Resolves `Authorization: Token <key>` headers to users and wraps bcrypt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Authentication
//!
//! Clients log in once and receive an opaque 40 character hex key. Every
//! later request sends it as `Authorization: Token <key>`. A request without
//! the header is anonymous; a header with an unknown key is rejected.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use rand::RngCore;
use tokio::task;
use tracing::debug;

use crate::constants::limits::AUTH_TOKEN_BYTES;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Authorization scheme prefix
pub const TOKEN_SCHEME: &str = "Token";

/// Generate a fresh random token key
#[must_use]
pub fn generate_token_key() -> String {
    let mut bytes = [0_u8; AUTH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a password with bcrypt on the blocking pool
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task panics
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Check a password against a bcrypt hash on the blocking pool
///
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_owned();
    let hash = hash.to_owned();

    task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Extract the token key from the `Authorization` header
///
/// # Errors
///
/// Returns `AuthInvalid` if the header is present but not `Token <key>`
pub fn extract_token(headers: &HeaderMap) -> AppResult<Option<&str>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::auth_invalid("Invalid authorization header encoding"))?;

    match value.split_once(' ') {
        Some((scheme, key)) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) && !key.trim().is_empty() => {
            Ok(Some(key.trim()))
        }
        _ => Err(AppError::auth_invalid(
            "Invalid authorization header, expected 'Token <key>'",
        )),
    }
}

/// Resolve the requesting user, `None` for anonymous requests
///
/// # Errors
///
/// Returns `AuthInvalid` for a malformed header or an unknown token
pub async fn authenticate_optional(
    headers: &HeaderMap,
    database: &Database,
) -> AppResult<Option<User>> {
    let Some(key) = extract_token(headers)? else {
        return Ok(None);
    };

    match database.tokens().user_for_token(key).await? {
        Some(user) => Ok(Some(user)),
        None => {
            debug!("Rejected unknown auth token");
            Err(AppError::auth_invalid("Invalid token"))
        }
    }
}

/// Resolve the requesting user, rejecting anonymous requests
///
/// # Errors
///
/// Returns `AuthRequired` without a token and `AuthInvalid` for a bad one
pub async fn authenticate(headers: &HeaderMap, database: &Database) -> AppResult<User> {
    authenticate_optional(headers, database)
        .await?
        .ok_or_else(AppError::auth_required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_key_is_40_hex_chars() {
        let key = generate_token_key();
        assert_eq!(key.len(), 40);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_token_key());
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers).unwrap(), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc123"));
        assert_eq!(extract_token(&headers).unwrap(), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert!(extract_token(&headers).is_err());
    }

    #[tokio::test]
    async fn test_password_round_trip() {
        let hash = hash_password("s3cret-pass", 4).await.unwrap();
        assert!(verify_password("s3cret-pass", &hash).await);
        assert!(!verify_password("wrong-pass", &hash).await);
        assert!(!verify_password("s3cret-pass", "not-a-hash").await);
    }
}
