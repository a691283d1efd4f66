// ABOUTME: Shared resource container handed to every route handler
// ABOUTME: Holds the database, media storage and configuration behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Server Resources
//!
//! Built once at startup and shared as axum state, so handlers never
//! reopen the pool or re-read configuration.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::media::MediaStorage;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Uploaded image storage
    pub media: Arc<MediaStorage>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wrap already constructed resources
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let media = MediaStorage::new(config.media.root.clone(), config.public_base_url.clone());
        Self {
            database: Arc::new(database),
            media: Arc::new(media),
            config: Arc::new(config),
        }
    }

    /// Open the configured database and build the resources
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database_url).await?;
        Ok(Self::new(database, config))
    }

    /// Absolute URL for a stored media path
    #[must_use]
    pub fn media_url(&self, relative: &str) -> String {
        self.media.url(relative)
    }
}
