// ABOUTME: Short recipe link redirects
// ABOUTME: Resolves /s/{id}/ to the recipe page or answers with a plain 404
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::constants::endpoints::RECIPE_PAGE_PREFIX;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Path prefix of short links
pub const SHORT_LINK_PREFIX: &str = "/s";

/// Short link routes
pub struct ShortLinkRoutes;

impl ShortLinkRoutes {
    /// Create the redirect route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/s/:id/", get(Self::handle_redirect))
            .with_state(resources)
    }

    /// Handle GET /s/:id/
    async fn handle_redirect(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let not_found = || {
            (
                StatusCode::NOT_FOUND,
                format!("Recipe with id '{id}' not found"),
            )
                .into_response()
        };

        let Ok(recipe_id) = id.parse::<i64>() else {
            return Ok(not_found());
        };
        if resources.database.recipes().get(recipe_id).await?.is_none() {
            return Ok(not_found());
        }

        Ok((
            StatusCode::FOUND,
            [(header::LOCATION, format!("{RECIPE_PAGE_PREFIX}/{recipe_id}"))],
        )
            .into_response())
    }
}
