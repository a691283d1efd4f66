// ABOUTME: Recipe model with ingredient lines, list filters and per-user collections
// ABOUTME: Favorites and the shopping cart share one collection abstraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Primary key
    pub id: i64,
    /// Author user id
    pub author_id: i64,
    /// Title
    pub name: String,
    /// Image path relative to the media root
    pub image: String,
    /// Instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Publication time, newest recipes are listed first
    pub published_at: DateTime<Utc>,
}

/// Ingredient reference in a create/update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    /// Ingredient id
    pub id: i64,
    /// Amount in the ingredient's unit
    pub amount: i64,
}

/// Ingredient line of a recipe joined with the catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredientLine {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Amount used by the recipe
    pub amount: i64,
}

/// Validated data for a new recipe, image already stored
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Title
    pub name: String,
    /// Instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Stored image path
    pub image: String,
    /// Ingredient lines, no duplicate ids
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated recipe update
///
/// Scalar fields are optional; the ingredient lines always replace the
/// existing ones.
#[derive(Debug, Clone)]
pub struct RecipeChanges {
    /// New title
    pub name: Option<String>,
    /// New instructions
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// New stored image path
    pub image: Option<String>,
    /// Replacement ingredient lines
    pub ingredients: Vec<IngredientAmount>,
}

/// Per-user recipe collections backed by a (user, recipe) join table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    /// Favorited recipes
    Favorites,
    /// Recipes whose ingredients go on the shopping list
    ShoppingCart,
}

impl RecipeCollection {
    /// Join table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human readable name used in error messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }
}

/// Filters for the recipe list
///
/// The collection filters only apply when the request is authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Exact author id
    pub author: Option<i64>,
    /// Exact recipe name
    pub name: Option<String>,
    /// Keep (true) or drop (false) the viewer's favorites
    pub is_favorited: Option<bool>,
    /// Keep (true) or drop (false) recipes in the viewer's cart
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Membership filters paired with the collection they check
    #[must_use]
    pub fn collection_filters(&self) -> [(RecipeCollection, Option<bool>); 2] {
        [
            (RecipeCollection::Favorites, self.is_favorited),
            (RecipeCollection::ShoppingCart, self.is_in_shopping_cart),
        ]
    }
}
