// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Field length limits, pagination defaults and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! Constants grouped by domain.

/// Service identifiers used in logs
pub mod service_names {
    /// Name of the HTTP server binary
    pub const COOKBOOK_SERVER: &str = "cookbook-server";
}

/// Field length and value limits enforced by request validation
pub mod limits {
    /// Maximum username length
    pub const USERNAME_MAX_LENGTH: usize = 150;
    /// Maximum email length
    pub const EMAIL_MAX_LENGTH: usize = 254;
    /// Maximum first/last name length
    pub const PERSON_NAME_MAX_LENGTH: usize = 150;
    /// Minimum password length
    pub const PASSWORD_MIN_LENGTH: usize = 8;
    /// Maximum recipe name length
    pub const RECIPE_NAME_MAX_LENGTH: usize = 256;
    /// Smallest accepted cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Largest accepted cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_767;
    /// Smallest accepted ingredient amount
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
    /// Largest accepted ingredient amount; cart totals stay well inside `i64`
    pub const MAX_INGREDIENT_AMOUNT: i64 = 2_147_483_647;
    /// Number of random bytes in an auth token key (hex encoded to 40 chars)
    pub const AUTH_TOKEN_BYTES: usize = 20;
}

/// Pagination defaults
pub mod pagination {
    /// Page size when the client sends no `limit`
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound for `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// HTTP endpoint paths referenced outside the routers
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Prefix for stored media files
    pub const MEDIA_PREFIX: &str = "/media";
    /// Front-end recipe page prefix used by short-link redirects
    pub const RECIPE_PAGE_PREFIX: &str = "/recipes";
}
