// ABOUTME: Parsing of query string values and path ids
// ABOUTME: Invalid query values are 400 errors, unparsable path ids are 404s
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use crate::errors::{AppError, AppResult};

/// Parse an optional boolean filter
///
/// Accepts `true`/`false` in any case and `1`/`0`. Absent or empty values
/// mean "no filter".
///
/// # Errors
///
/// Returns a validation error on `field` for any other value
pub fn parse_bool_param(value: Option<&str>, field: &str) -> AppResult<Option<bool>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(AppError::invalid_input(format!(
            "'{field}' must be one of true, false, 1, 0"
        ))
        .with_field(field)),
    }
}

/// Parse an optional integer id filter
///
/// # Errors
///
/// Returns a validation error on `field` if the value is not an integer
pub fn parse_id_param(value: Option<&str>, field: &str) -> AppResult<Option<i64>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i64>().map(Some).map_err(|_| {
        AppError::invalid_input(format!("'{field}' must be an integer id")).with_field(field)
    })
}

/// Parse an optional non-negative count such as `recipes_limit`
///
/// # Errors
///
/// Returns a validation error on `field` if the value is not a
/// non-negative integer
pub fn parse_count_param(value: Option<&str>, field: &str) -> AppResult<Option<u32>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<u32>().map(Some).map_err(|_| {
        AppError::invalid_input(format!("'{field}' must be a non-negative integer"))
            .with_field(field)
    })
}

/// Parse a path id; anything that is not an integer cannot name a row
///
/// # Errors
///
/// Returns `ResourceNotFound` for a non-numeric id
pub fn parse_path_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::not_found(format!("{resource} {raw}")))
}
