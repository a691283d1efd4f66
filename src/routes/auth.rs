// ABOUTME: Token authentication route handlers
// ABOUTME: Exchanges email and password for a persistent token and revokes it on logout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::auth::{authenticate, generate_token_key, verify_password};
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token for the `Authorization: Token <key>` header
    pub auth_token: String,
}

/// Token authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the login and logout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/token/login/", post(Self::handle_login))
            .route("/api/auth/token/logout/", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /api/auth/token/login/
    ///
    /// A user holds at most one token; logging in again returns it.
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let email = request
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("email"))?;
        let password = request
            .password
            .filter(|password| !password.is_empty())
            .ok_or_else(|| AppError::missing_field("password"))?;

        let invalid_credentials =
            || AppError::invalid_input("Unable to log in with provided credentials");

        let user = resources
            .database
            .users()
            .get_by_email(email.trim())
            .await?
            .ok_or_else(invalid_credentials)?;
        if !verify_password(&password, &user.password_hash).await {
            return Err(invalid_credentials());
        }

        let auth_token = resources
            .database
            .tokens()
            .get_or_create(user.id, &generate_token_key())
            .await?;
        info!(user_id = user.id, "User logged in");

        Ok(Json(LoginResponse { auth_token }).into_response())
    }

    /// Handle POST /api/auth/token/logout/
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        resources.database.tokens().revoke(user.id).await?;
        info!(user_id = user.id, "User logged out");

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
