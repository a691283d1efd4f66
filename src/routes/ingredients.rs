// ABOUTME: Ingredient catalog route handlers
// ABOUTME: Unpaginated name search and single ingredient lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::utils::query::parse_path_id;

/// Query parameters for the ingredient search
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearchQuery {
    /// Name fragment
    pub name: Option<String>,
}

/// Ingredient routes
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/ - search the catalog
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientSearchQuery>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .database
            .ingredients()
            .search(query.name.as_deref())
            .await?;

        Ok(Json(ingredients).into_response())
    }

    /// Handle GET /api/ingredients/:id/ - get one ingredient
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let ingredient_id = parse_path_id(&id, "Ingredient")?;
        let ingredient = resources
            .database
            .ingredients()
            .get(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))?;

        Ok(Json(ingredient).into_response())
    }
}
