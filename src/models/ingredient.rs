// ABOUTME: Ingredient catalog model
// ABOUTME: An ingredient is a (name, measurement unit) pair referenced by recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use serde::{Deserialize, Serialize};

/// Catalog ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit amounts are measured in, e.g. `g`
    pub measurement_unit: String,
}

/// Ingredient to import, as found in the catalog JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Display name
    pub name: String,
    /// Unit amounts are measured in
    pub measurement_unit: String,
}
