// ABOUTME: Main library entry point for the cookbook recipe-sharing server
// ABOUTME: Exposes the HTTP API, persistence layer and supporting services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Cookbook Server
//!
//! A recipe-sharing web backend. Users publish recipes built from a shared
//! ingredient catalog, follow authors, keep favorites and a shopping cart,
//! and download an aggregated shopping list for the recipes in their cart.
//!
//! ## Architecture
//!
//! - **Routes**: one `XRoutes` struct per domain, merged by [`server`]
//! - **Services**: request validation and shopping list rendering
//! - **Database**: `SQLite` managers, one per table family
//! - **Media**: decoded image uploads stored under the media root
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cookbook_server::config::environment::ServerConfig;
//! use cookbook_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::from_config(config).await?;
//!     resources.database.migrate().await?;
//!     cookbook_server::server::run(Arc::new(resources)).await
//! }
//! ```

/// Token authentication and password hashing
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Application constants and limits
pub mod constants;

/// `SQLite` persistence layer
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Image upload decoding and storage
pub mod media;

/// HTTP middleware layers
pub mod middleware;

/// Domain row types
pub mod models;

/// Page-number pagination
pub mod pagination;

/// Shared server resources handed to every route
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Validation and shopping list rendering
pub mod services;

/// Query string parsing helpers
pub mod utils;
