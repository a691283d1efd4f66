// ABOUTME: Business logic extracted from route handlers
// ABOUTME: Request validation for recipes and users plus shopping list rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

/// Recipe input validation
pub mod recipes;
/// Plain-text shopping list document
pub mod shopping_list;
/// Registration and password validation
pub mod users;
