// ABOUTME: Aggregated shopping list model
// ABOUTME: Summed ingredient totals plus the names of the recipes they came from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

/// One aggregated line of the shopping list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Sum of the amounts across every recipe in the cart
    pub total_amount: i64,
}

/// Everything needed to render the shopping list document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    /// Lines ordered by ingredient name
    pub items: Vec<ShoppingListItem>,
    /// Names of the recipes in the cart, sorted
    pub recipes: Vec<String>,
}

impl ShoppingList {
    /// Whether the cart contributed nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.recipes.is_empty()
    }
}
