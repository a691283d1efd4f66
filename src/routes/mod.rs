// ABOUTME: Route module organization for the cookbook HTTP API
// ABOUTME: One routes struct per domain plus shared request body handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! Route module for the cookbook server
//!
//! Each domain module exposes a `XRoutes::routes(resources)` router with
//! thin handlers that authenticate, validate through the services layer and
//! delegate persistence to the database managers.

/// Token login and logout
pub mod auth;
/// Liveness endpoint
pub mod health;
/// Ingredient catalog lookup
pub mod ingredients;
/// Recipe CRUD, favorites, cart and shopping list export
pub mod recipes;
/// `/s/{id}/` redirects
pub mod short_links;
/// Registration, profiles, avatars and subscriptions
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use short_links::ShortLinkRoutes;
pub use users::UserRoutes;

use crate::errors::{AppError, AppResult};

/// Unwrap a JSON body, turning extractor rejections into 400 errors
///
/// # Errors
///
/// Returns `InvalidFormat` if the body is missing, not JSON, or has the
/// wrong shape
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_format(format!("Invalid request body: {}", rejection.body_text())))
}
