// ABOUTME: Recipe route handlers: CRUD, favorites, shopping cart and shopping list export
// ABOUTME: Builds the recipe JSON representation with author, ingredient lines and viewer flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Recipe Routes
//!
//! Listing and detail are public. Creating requires a token; changing or
//! deleting a recipe is limited to its author. Favorites and the shopping
//! cart are per-user collections toggled with `POST`/`DELETE`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use super::users::{user_response, UserResponse};
use crate::auth::{authenticate, authenticate_optional};
use crate::errors::{AppError, AppResult};
use crate::media::MediaDir;
use crate::models::{
    NewRecipe, Recipe, RecipeChanges, RecipeCollection, RecipeFilter, RecipeIngredientLine, User,
};
use crate::pagination::{Page, PageRequest};
use crate::resources::ServerResources;
use crate::services::recipes::{ensure_ingredients_exist, RecipeInput};
use crate::services::shopping_list::{render_shopping_list, SHOPPING_LIST_FILENAME};
use crate::utils::query::{parse_bool_param, parse_id_param, parse_path_id};

const RECIPES_PATH: &str = "/api/recipes/";

/// Query parameters for the recipe list
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Author id
    pub author: Option<String>,
    /// Exact recipe name
    pub name: Option<String>,
    /// Only recipes the viewer favorited (or did not)
    pub is_favorited: Option<String>,
    /// Only recipes in the viewer's cart (or not)
    pub is_in_shopping_cart: Option<String>,
}

/// Full recipe representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Author profile
    pub author: UserResponse,
    /// Ingredient lines with amounts
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Whether the viewer favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

/// Short recipe representation used by collections and author listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummaryResponse {
    /// Recipe id
    pub id: i64,
    /// Title
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl RecipeSummaryResponse {
    /// Summarize a stored recipe
    #[must_use]
    pub fn from_recipe(resources: &ServerResources, recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: resources.media_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short link response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    /// Absolute short URL
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Build the full representation of `recipe` as seen by `viewer`
///
/// # Errors
///
/// Returns an error if a lookup fails or the author row is missing
pub async fn recipe_response(
    resources: &ServerResources,
    recipe: Recipe,
    viewer: Option<&User>,
) -> AppResult<RecipeResponse> {
    let database = &resources.database;
    let author = database
        .users()
        .get(recipe.author_id)
        .await?
        .ok_or_else(|| AppError::internal(format!("Author of recipe {} is missing", recipe.id)))?;
    let ingredients = database.recipes().ingredients(recipe.id).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer) => {
            let collections = database.collections();
            (
                collections
                    .contains(RecipeCollection::Favorites, viewer.id, recipe.id)
                    .await?,
                collections
                    .contains(RecipeCollection::ShoppingCart, viewer.id, recipe.id)
                    .await?,
            )
        }
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        author: user_response(resources, &author, viewer).await?,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        image: resources.media_url(&recipe.image),
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    })
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(RECIPES_PATH, get(Self::handle_list))
            .route(RECIPES_PATH, post(Self::handle_create))
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .route("/api/recipes/:id/get-link/", get(Self::handle_get_link))
            .with_state(resources)
    }

    /// Handle GET /api/recipes/ - paginated, filtered list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.database).await?;
        let page = PageRequest::from_params(
            query.page.as_deref(),
            query.limit.as_deref(),
            resources.config.default_page_size,
        )?;
        let filter = RecipeFilter {
            author: parse_id_param(query.author.as_deref(), "author")?,
            name: query.name.clone().filter(|name| !name.is_empty()),
            is_favorited: parse_bool_param(query.is_favorited.as_deref(), "is_favorited")?,
            is_in_shopping_cart: parse_bool_param(
                query.is_in_shopping_cart.as_deref(),
                "is_in_shopping_cart",
            )?,
        };

        let (recipes, count) = resources
            .database
            .recipes()
            .list(&filter, viewer.as_ref().map(|user| user.id), &page)
            .await?;

        let mut results = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            results.push(recipe_response(&resources, recipe, viewer.as_ref()).await?);
        }

        let extra: Vec<(&str, String)> = [
            ("author", &query.author),
            ("name", &query.name),
            ("is_favorited", &query.is_favorited),
            ("is_in_shopping_cart", &query.is_in_shopping_cart),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
        .collect();

        Ok(Json(Page::new(results, count, &page, RECIPES_PATH, &extra)).into_response())
    }

    /// Handle POST /api/recipes/ - create a recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<RecipeInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let input = json_body(payload)?.validate_for_create()?;
        ensure_ingredients_exist(&resources.database, &input.ingredients).await?;

        let image = resources
            .media
            .save(MediaDir::RecipeImages, &input.image)
            .await?;
        let new_recipe = NewRecipe {
            name: input.name,
            text: input.text,
            cooking_time: input.cooking_time,
            image: image.clone(),
            ingredients: input.ingredients,
        };

        let recipe = match resources.database.recipes().create(user.id, &new_recipe).await {
            Ok(recipe) => recipe,
            Err(e) => {
                resources.media.delete(&image).await;
                return Err(e);
            }
        };
        info!(recipe_id = recipe.id, author_id = user.id, "Created recipe");

        let response = recipe_response(&resources, recipe, Some(&user)).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.database).await?;
        let recipe = load_recipe(&resources, &id).await?;

        let response = recipe_response(&resources, recipe, viewer.as_ref()).await?;
        Ok(Json(response).into_response())
    }

    /// Handle PATCH /api/recipes/:id/ - author only, replaces ingredient lines
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        payload: Result<Json<RecipeInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let existing = load_recipe(&resources, &id).await?;
        ensure_author(&existing, &user)?;

        let changes = json_body(payload)?.validate_for_update()?;
        ensure_ingredients_exist(&resources.database, &changes.ingredients).await?;

        let new_image = match &changes.image {
            Some(image) => Some(resources.media.save(MediaDir::RecipeImages, image).await?),
            None => None,
        };
        let recipe_changes = RecipeChanges {
            name: changes.name,
            text: changes.text,
            cooking_time: changes.cooking_time,
            image: new_image.clone(),
            ingredients: changes.ingredients,
        };

        let updated = match resources
            .database
            .recipes()
            .update(existing.id, &recipe_changes)
            .await
        {
            Ok(recipe) => recipe,
            Err(e) => {
                if let Some(image) = &new_image {
                    resources.media.delete(image).await;
                }
                return Err(e);
            }
        };
        if new_image.is_some() {
            resources.media.delete(&existing.image).await;
        }
        info!(recipe_id = updated.id, "Updated recipe");

        let response = recipe_response(&resources, updated, Some(&user)).await?;
        Ok(Json(response).into_response())
    }

    /// Handle DELETE /api/recipes/:id/ - author only
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let recipe = load_recipe(&resources, &id).await?;
        ensure_author(&recipe, &user)?;

        if !resources.database.recipes().delete(recipe.id).await? {
            return Err(AppError::not_found(format!("Recipe {}", recipe.id)));
        }
        resources.media.delete(&recipe.image).await;
        info!(recipe_id = recipe.id, "Deleted recipe");

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        add_to_collection(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        remove_from_collection(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        add_to_collection(&resources, &headers, &id, RecipeCollection::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        remove_from_collection(&resources, &headers, &id, RecipeCollection::ShoppingCart).await
    }

    /// Handle GET /api/recipes/:id/get-link/
    async fn handle_get_link(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe = load_recipe(&resources, &id).await?;
        let short_link = format!("{}/s/{}/", resources.config.public_base_url, recipe.id);

        Ok(Json(ShortLinkResponse { short_link }).into_response())
    }

    /// Handle GET /api/recipes/download_shopping_cart/ - plain-text attachment
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let list = resources.database.shopping_list().build(user.id).await?;
        let body = render_shopping_list(&list, Utc::now().date_naive());

        Ok((
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
                ),
            ],
            body,
        )
            .into_response())
    }
}

async fn load_recipe(resources: &ServerResources, raw_id: &str) -> AppResult<Recipe> {
    let recipe_id = parse_path_id(raw_id, "Recipe")?;
    resources
        .database
        .recipes()
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
}

fn ensure_author(recipe: &Recipe, user: &User) -> AppResult<()> {
    if recipe.author_id == user.id {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Only the author can change this recipe",
        ))
    }
}

async fn add_to_collection(
    resources: &ServerResources,
    headers: &HeaderMap,
    raw_id: &str,
    collection: RecipeCollection,
) -> Result<Response, AppError> {
    let user = authenticate(headers, &resources.database).await?;
    let recipe = load_recipe(resources, raw_id).await?;

    resources
        .database
        .collections()
        .add(collection, user.id, recipe.id)
        .await?;
    info!(
        user_id = user.id,
        recipe_id = recipe.id,
        collection = collection.table(),
        "Added recipe to collection"
    );

    let summary = RecipeSummaryResponse::from_recipe(resources, &recipe);
    Ok((StatusCode::CREATED, Json(summary)).into_response())
}

async fn remove_from_collection(
    resources: &ServerResources,
    headers: &HeaderMap,
    raw_id: &str,
    collection: RecipeCollection,
) -> Result<Response, AppError> {
    let user = authenticate(headers, &resources.database).await?;
    let recipe = load_recipe(resources, raw_id).await?;

    let removed = resources
        .database
        .collections()
        .remove(collection, user.id, recipe.id)
        .await?;
    if !removed {
        return Err(AppError::not_found(format!(
            "Recipe {} in {}",
            recipe.id,
            collection.label()
        )));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
