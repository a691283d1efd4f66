// ABOUTME: Environment configuration for the cookbook server
// ABOUTME: Reads ports, database, media and auth settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! Environment-based configuration management

use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8000;
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/cookbook.db";
/// Default directory for uploaded images
pub const DEFAULT_MEDIA_ROOT: &str = "./media";
/// bcrypt cost used in production
pub const PRODUCTION_BCRYPT_COST: u32 = 12;
/// bcrypt cost used in development and tests
pub const FAST_BCRYPT_COST: u32 = 4;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL or a bare file path
    ///
    /// # Errors
    ///
    /// Returns an error for URLs naming another database engine
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path) = s.strip_prefix("sqlite:") {
            let path = path.trim_start_matches("//");
            if path == ":memory:" || path.is_empty() {
                return Ok(Self::Memory);
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path),
            });
        }
        if s.contains("://") {
            bail!("Unsupported database URL '{s}': only sqlite is supported");
        }
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Password hashing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
}

/// Uploaded file storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory files are written under
    pub root: PathBuf,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Media storage
    pub media: MediaConfig,
    /// Externally visible origin used for media URLs and short links
    pub public_base_url: String,
    /// Password hashing
    pub auth: AuthConfig,
    /// CORS
    pub cors: CorsConfig,
    /// Page size when `limit` is not given
    pub default_page_size: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port: u16 = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
            .parse()
            .context("Invalid HTTP_PORT value")?;
        let environment =
            Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));
        let default_cost = if environment.is_production() {
            PRODUCTION_BCRYPT_COST
        } else {
            FAST_BCRYPT_COST
        };
        let bcrypt_cost: u32 = env_var_or("BCRYPT_COST", &default_cost.to_string())
            .parse()
            .context("Invalid BCRYPT_COST value")?;
        let default_page_size: u32 =
            env_var_or("DEFAULT_PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .context("Invalid DEFAULT_PAGE_SIZE value")?;

        let config = Self {
            http_port,
            environment,
            database_url: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                DEFAULT_DATABASE_URL,
            ))?,
            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", DEFAULT_MEDIA_ROOT)),
            },
            public_base_url: env_var_or(
                "PUBLIC_BASE_URL",
                &format!("http://localhost:{http_port}"),
            ),
            auth: AuthConfig { bcrypt_cost },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            },
            default_page_size,
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for tests: in-memory database, fast hashing
    #[must_use]
    pub fn for_testing(media_root: PathBuf) -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            environment: Environment::Testing,
            database_url: DatabaseUrl::Memory,
            media: MediaConfig { root: media_root },
            public_base_url: "http://testserver".to_owned(),
            auth: AuthConfig {
                bcrypt_cost: FAST_BCRYPT_COST,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_owned()],
            },
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Validate value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            );
        }
        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            bail!("DEFAULT_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}");
        }
        if self.public_base_url.ends_with('/') {
            bail!("PUBLIC_BASE_URL must not end with '/'");
        }
        Ok(())
    }

    /// Human readable summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Cookbook Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Media Root: {}\n\
             - Public URL: {}\n\
             - CORS Origins: {}\n\
             - Default Page Size: {}",
            self.http_port,
            self.environment,
            self.database_url,
            self.media.root.display(),
            self.public_base_url,
            self.cors.allowed_origins.join(","),
            self.default_page_size,
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/cookbook.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/cookbook.db")
            }
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("whatever"),
            Environment::Development
        );
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,"),
            vec!["http://a.test".to_owned(), "http://b.test".to_owned()]
        );
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let mut config = ServerConfig::for_testing(PathBuf::from("media"));
        assert!(config.validate().is_ok());
        config.public_base_url = "http://localhost:8000/".to_owned();
        assert!(config.validate().is_err());
    }
}
