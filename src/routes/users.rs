// ABOUTME: User route handlers: registration, profiles, password, avatar and subscriptions
// ABOUTME: Builds the user JSON representation including the viewer's subscription flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use super::recipes::RecipeSummaryResponse;
use crate::auth::{authenticate, authenticate_optional, hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::media::{DataUri, MediaDir};
use crate::models::{NewUser, User};
use crate::pagination::{Page, PageRequest};
use crate::resources::ServerResources;
use crate::services::users::{validate_password, RegistrationInput};
use crate::utils::query::{parse_count_param, parse_path_id};

const USERS_PATH: &str = "/api/users/";
const SUBSCRIPTIONS_PATH: &str = "/api/users/subscriptions/";

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Login email
    pub email: String,
    /// User id
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the viewer follows this user
    pub is_subscribed: bool,
    /// Absolute avatar URL
    pub avatar: Option<String>,
}

/// Response to a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// Login email
    pub email: String,
    /// New user id
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// A followed author with their recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionAuthorResponse {
    /// Author profile
    #[serde(flatten)]
    pub user: UserResponse,
    /// Newest recipes, truncated by `recipes_limit`
    pub recipes: Vec<RecipeSummaryResponse>,
    /// Total number of the author's recipes
    pub recipes_count: u64,
}

/// Password change request body
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Replacement password
    pub new_password: Option<String>,
    /// Password currently in use
    pub current_password: Option<String>,
}

/// Avatar upload request body
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// Base64 image data URI
    pub avatar: Option<String>,
}

/// Avatar upload response body
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    /// Absolute avatar URL
    pub avatar: String,
}

/// Query parameters for paginated user lists
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Number of recipes shown per author
    pub recipes_limit: Option<String>,
}

/// Build the public representation of `user` as seen by `viewer`
///
/// # Errors
///
/// Returns an error if the subscription lookup fails
pub async fn user_response(
    resources: &ServerResources,
    user: &User,
    viewer: Option<&User>,
) -> AppResult<UserResponse> {
    let is_subscribed = match viewer {
        Some(viewer) => {
            resources
                .database
                .subscriptions()
                .is_subscribed(viewer.id, user.id)
                .await?
        }
        None => false,
    };

    Ok(UserResponse {
        email: user.email.clone(),
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_subscribed,
        avatar: user.avatar.as_deref().map(|path| resources.media_url(path)),
    })
}

async fn subscription_author_response(
    resources: &ServerResources,
    author: &User,
    viewer: &User,
    recipes_limit: Option<u32>,
) -> AppResult<SubscriptionAuthorResponse> {
    let recipes_manager = resources.database.recipes();
    let recipes = recipes_manager
        .list_by_author(author.id, recipes_limit)
        .await?
        .iter()
        .map(|recipe| RecipeSummaryResponse::from_recipe(resources, recipe))
        .collect();

    Ok(SubscriptionAuthorResponse {
        user: user_response(resources, author, Some(viewer)).await?,
        recipes,
        recipes_count: recipes_manager.count_by_author(author.id).await?,
    })
}

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(USERS_PATH, get(Self::handle_list).post(Self::handle_register))
            .route("/api/users/me/", get(Self::handle_me))
            .route("/api/users/set_password/", post(Self::handle_set_password))
            .route(
                "/api/users/me/avatar/",
                put(Self::handle_set_avatar).delete(Self::handle_delete_avatar),
            )
            .route(SUBSCRIPTIONS_PATH, get(Self::handle_subscriptions))
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users/ - paginated user list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<UserListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.database).await?;
        let page = PageRequest::from_params(
            query.page.as_deref(),
            query.limit.as_deref(),
            resources.config.default_page_size,
        )?;

        let (users, count) = resources.database.users().list(&page).await?;
        let mut results = Vec::with_capacity(users.len());
        for user in &users {
            results.push(user_response(&resources, user, viewer.as_ref()).await?);
        }

        Ok(Json(Page::new(results, count, &page, USERS_PATH, &[])).into_response())
    }

    /// Handle POST /api/users/ - register a new account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RegistrationInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let registration = json_body(payload)?.validate()?;
        let users = resources.database.users();

        if users.email_taken(&registration.email).await? {
            return Err(
                AppError::already_exists("A user with that email already exists")
                    .with_field("email"),
            );
        }
        if users.username_taken(&registration.username).await? {
            return Err(
                AppError::already_exists("A user with that username already exists")
                    .with_field("username"),
            );
        }

        let password_hash =
            hash_password(&registration.password, resources.config.auth.bcrypt_cost).await?;
        let user = users
            .create(&NewUser {
                email: registration.email,
                username: registration.username,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "Registered user");

        let response = RegistrationResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let response = user_response(&resources, &user, Some(&user)).await?;
        Ok(Json(response).into_response())
    }

    /// Handle GET /api/users/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.database).await?;
        let user = load_user(&resources, &id).await?;

        let response = user_response(&resources, &user, viewer.as_ref()).await?;
        Ok(Json(response).into_response())
    }

    /// Handle POST /api/users/set_password/
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<SetPasswordRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let request = json_body(payload)?;
        let current = request
            .current_password
            .ok_or_else(|| AppError::missing_field("current_password"))?;
        let new_password = request
            .new_password
            .ok_or_else(|| AppError::missing_field("new_password"))?;

        if !verify_password(&current, &user.password_hash).await {
            return Err(AppError::invalid_input("Current password is incorrect")
                .with_field("current_password"));
        }
        validate_password(&new_password, "new_password")?;

        let password_hash =
            hash_password(&new_password, resources.config.auth.bcrypt_cost).await?;
        resources
            .database
            .users()
            .update_password(user.id, &password_hash)
            .await?;
        info!(user_id = user.id, "Changed password");

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle PUT /api/users/me/avatar/
    async fn handle_set_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<AvatarRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let raw = json_body(payload)?
            .avatar
            .filter(|avatar| !avatar.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("avatar"))?;
        let image = DataUri::parse(&raw, "avatar")?;

        let stored = resources.media.save(MediaDir::Avatars, &image).await?;
        let previous = match resources
            .database
            .users()
            .set_avatar(user.id, Some(&stored))
            .await
        {
            Ok(previous) => previous,
            Err(e) => {
                resources.media.delete(&stored).await;
                return Err(e);
            }
        };
        if let Some(previous) = previous {
            resources.media.delete(&previous).await;
        }

        Ok(Json(AvatarResponse {
            avatar: resources.media_url(&stored),
        })
        .into_response())
    }

    /// Handle DELETE /api/users/me/avatar/
    async fn handle_delete_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        if let Some(previous) = resources.database.users().set_avatar(user.id, None).await? {
            resources.media.delete(&previous).await;
        }

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/users/subscriptions/ - followed authors with recipes
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<UserListQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let page = PageRequest::from_params(
            query.page.as_deref(),
            query.limit.as_deref(),
            resources.config.default_page_size,
        )?;
        let recipes_limit = parse_count_param(query.recipes_limit.as_deref(), "recipes_limit")?;

        let (authors, count) = resources
            .database
            .subscriptions()
            .list_authors(user.id, &page)
            .await?;
        let mut results = Vec::with_capacity(authors.len());
        for author in &authors {
            results.push(
                subscription_author_response(&resources, author, &user, recipes_limit).await?,
            );
        }

        let extra: Vec<(&str, String)> = query
            .recipes_limit
            .map(|limit| vec![("recipes_limit", limit)])
            .unwrap_or_default();
        Ok(Json(Page::new(results, count, &page, SUBSCRIPTIONS_PATH, &extra)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(query): Query<UserListQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let author = load_user(&resources, &id).await?;
        let recipes_limit = parse_count_param(query.recipes_limit.as_deref(), "recipes_limit")?;
        ensure_not_self(&user, &author)?;

        resources
            .database
            .subscriptions()
            .add(user.id, author.id)
            .await?;
        info!(user_id = user.id, author_id = author.id, "Subscribed to author");

        let response =
            subscription_author_response(&resources, &author, &user, recipes_limit).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let author = load_user(&resources, &id).await?;
        ensure_not_self(&user, &author)?;

        let removed = resources
            .database
            .subscriptions()
            .remove(user.id, author.id)
            .await?;
        if !removed {
            return Err(AppError::not_found(format!(
                "Subscription to user {}",
                author.id
            )));
        }

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn load_user(resources: &ServerResources, raw_id: &str) -> AppResult<User> {
    let user_id = parse_path_id(raw_id, "User")?;
    resources
        .database
        .users()
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {user_id}")))
}

fn ensure_not_self(user: &User, author: &User) -> AppResult<()> {
    if user.id == author.id {
        return Err(AppError::invalid_input("You cannot subscribe to yourself"));
    }
    Ok(())
}
