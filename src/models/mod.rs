// ABOUTME: Domain models for users, ingredients, recipes and shopping lists
// ABOUTME: Plain row structs shared by the database managers and route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Data Models
//!
//! Entities as stored in the database. Wire representations live next to
//! the route handlers and are built from these structs.

/// Ingredients and their measurement units
pub mod ingredient;
/// Recipes, ingredient lines, collections and list filters
pub mod recipe;
/// Aggregated shopping list
pub mod shopping_list;
/// Registered users
pub mod user;

pub use ingredient::{Ingredient, NewIngredient};
pub use recipe::{
    IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeCollection, RecipeFilter,
    RecipeIngredientLine,
};
pub use shopping_list::{ShoppingList, ShoppingListItem};
pub use user::{NewUser, User};
