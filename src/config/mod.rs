// ABOUTME: Configuration module entry point
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

/// Environment variable parsing and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseUrl, Environment, MediaConfig, ServerConfig,
};
