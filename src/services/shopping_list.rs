// ABOUTME: Renders an aggregated shopping list as a plain-text document
// ABOUTME: Dated header, numbered ingredient totals and the contributing recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::ShoppingList;

/// File name offered to the client
pub const SHOPPING_LIST_FILENAME: &str = "Shopping_cart.txt";

/// Render the shopping list document for `date`
#[must_use]
pub fn render_shopping_list(list: &ShoppingList, date: NaiveDate) -> String {
    let mut document = format!("Shopping list\nDate: {}\n\nIngredients:\n", date.format("%d.%m.%Y"));

    for (index, item) in list.items.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(
            document,
            "{}. {} - {} {}",
            index + 1,
            capitalize(&item.name),
            item.total_amount,
            item.measurement_unit
        );
    }

    document.push_str("\nRecipes:\n");
    for recipe in &list.recipes {
        document.push_str(recipe);
        document.push('\n');
    }
    document
}

/// Upper-case the first character, leaving the rest as is
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShoppingListItem;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_render_numbered_lines() {
        let list = ShoppingList {
            items: vec![
                ShoppingListItem {
                    name: "salt".to_owned(),
                    measurement_unit: "g".to_owned(),
                    total_amount: 150,
                },
                ShoppingListItem {
                    name: "яйца".to_owned(),
                    measurement_unit: "шт".to_owned(),
                    total_amount: 3,
                },
            ],
            recipes: vec!["Recipe A".to_owned(), "Recipe B".to_owned()],
        };

        assert_eq!(
            render_shopping_list(&list, date()),
            "Shopping list\nDate: 18.10.2026\n\nIngredients:\n\
             1. Salt - 150 g\n2. Яйца - 3 шт\n\nRecipes:\nRecipe A\nRecipe B\n"
        );
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(
            render_shopping_list(&ShoppingList::default(), date()),
            "Shopping list\nDate: 18.10.2026\n\nIngredients:\n\nRecipes:\n"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("sugar"), "Sugar");
        assert_eq!(capitalize("ßeta"), "SSeta");
    }
}
