// ABOUTME: Utility modules shared by the route handlers
// ABOUTME: Query string and path parameter parsing with consistent errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

/// Query and path parameter parsing
pub mod query;
