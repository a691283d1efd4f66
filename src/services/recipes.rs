// ABOUTME: Validation of recipe create/update requests
// ABOUTME: Checks ingredient lists, amounts, cooking time, text fields and the image payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! Every check runs before anything is written, so a rejected request
//! leaves the stored recipe and its ingredient lines untouched.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::constants::limits::{
    MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
    RECIPE_NAME_MAX_LENGTH,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::media::DataUri;
use crate::models::IngredientAmount;

/// Recipe fields as sent by the client for both create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeInput {
    /// Ingredient ids with amounts
    pub ingredients: Option<Vec<IngredientAmount>>,
    /// Title
    pub name: Option<String>,
    /// Instructions
    pub text: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Base64 image data URI
    pub image: Option<String>,
}

/// Fully validated new recipe, image decoded but not yet stored
#[derive(Debug, Clone)]
pub struct ValidatedRecipe {
    /// Title
    pub name: String,
    /// Instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Decoded image
    pub image: DataUri,
    /// Ingredient lines
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated update; only `ingredients` is mandatory
#[derive(Debug, Clone)]
pub struct ValidatedChanges {
    /// New title
    pub name: Option<String>,
    /// New instructions
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// New decoded image
    pub image: Option<DataUri>,
    /// Replacement ingredient lines
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeInput {
    /// Validate a create request; every field is required
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for the first invalid field
    pub fn validate_for_create(self) -> AppResult<ValidatedRecipe> {
        let ingredients = validate_ingredients(self.ingredients)?;
        let image = match self.image.as_deref().map(str::trim) {
            Some(image) if !image.is_empty() => DataUri::parse(image, "image")?,
            _ => return Err(AppError::missing_field("image")),
        };

        Ok(ValidatedRecipe {
            name: validate_name(self.name.ok_or_else(|| AppError::missing_field("name"))?)?,
            text: validate_text(self.text.ok_or_else(|| AppError::missing_field("text"))?)?,
            cooking_time: validate_cooking_time(
                self.cooking_time
                    .ok_or_else(|| AppError::missing_field("cooking_time"))?,
            )?,
            image,
            ingredients,
        })
    }

    /// Validate an update request
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for the first invalid field
    pub fn validate_for_update(self) -> AppResult<ValidatedChanges> {
        let ingredients = validate_ingredients(self.ingredients)?;
        let image = match self.image.as_deref().map(str::trim) {
            Some("") => return Err(AppError::missing_field("image")),
            Some(image) => Some(DataUri::parse(image, "image")?),
            None => None,
        };

        Ok(ValidatedChanges {
            name: self.name.map(validate_name).transpose()?,
            text: self.text.map(validate_text).transpose()?,
            cooking_time: self.cooking_time.map(validate_cooking_time).transpose()?,
            image,
            ingredients,
        })
    }
}

/// Check the ingredient list shape: present, non-empty, unique ids, amounts in range
///
/// # Errors
///
/// Returns a validation error on the `ingredients` field
pub fn validate_ingredients(
    ingredients: Option<Vec<IngredientAmount>>,
) -> AppResult<Vec<IngredientAmount>> {
    let ingredients = ingredients.ok_or_else(|| AppError::missing_field("ingredients"))?;
    if ingredients.is_empty() {
        return Err(
            AppError::invalid_input("At least one ingredient is required").with_field("ingredients"),
        );
    }

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for line in &ingredients {
        if !seen.insert(line.id) {
            duplicates.insert(line.id);
        }
    }
    if !duplicates.is_empty() {
        return Err(AppError::invalid_input(format!(
            "Ingredients must not repeat, duplicated ids: {}",
            join_ids(&duplicates)
        ))
        .with_field("ingredients"));
    }

    if let Some(line) = ingredients
        .iter()
        .find(|line| !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&line.amount))
    {
        return Err(AppError::out_of_range(format!(
            "Amount of ingredient {} must be between {MIN_INGREDIENT_AMOUNT} and {MAX_INGREDIENT_AMOUNT}",
            line.id
        ))
        .with_field("ingredients"));
    }

    Ok(ingredients)
}

/// Check every referenced ingredient exists in the catalog
///
/// # Errors
///
/// Returns a validation error naming the unknown ids
pub async fn ensure_ingredients_exist(
    database: &Database,
    ingredients: &[IngredientAmount],
) -> AppResult<()> {
    let requested: BTreeSet<i64> = ingredients.iter().map(|line| line.id).collect();
    let ids: Vec<i64> = requested.iter().copied().collect();
    let found: BTreeSet<i64> = database
        .ingredients()
        .existing_ids(&ids)
        .await?
        .into_iter()
        .collect();

    let missing: BTreeSet<i64> = requested.difference(&found).copied().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(
            AppError::invalid_input(format!("Unknown ingredients: {}", join_ids(&missing)))
                .with_field("ingredients"),
        )
    }
}

/// Cooking time is whole minutes between the configured bounds
///
/// # Errors
///
/// Returns `ValueOutOfRange` on the `cooking_time` field
pub fn validate_cooking_time(cooking_time: i64) -> AppResult<i64> {
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&cooking_time) {
        return Err(AppError::out_of_range(format!(
            "Cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes"
        ))
        .with_field("cooking_time"));
    }
    Ok(cooking_time)
}

fn validate_name(name: String) -> AppResult<String> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::invalid_input("Recipe name must not be empty").with_field("name"));
    }
    if name.chars().count() > RECIPE_NAME_MAX_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Recipe name must be at most {RECIPE_NAME_MAX_LENGTH} characters"
        ))
        .with_field("name"));
    }
    Ok(name)
}

fn validate_text(text: String) -> AppResult<String> {
    if text.trim().is_empty() {
        return Err(AppError::invalid_input("Recipe text must not be empty").with_field("text"));
    }
    Ok(text)
}

fn join_ids(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
