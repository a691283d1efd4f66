// ABOUTME: Conversion from sqlx errors into the unified error type
// ABOUTME: Unique and check constraint violations become client errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => {
                Self::new(ErrorCode::ResourceNotFound, "Record not found").with_source(error)
            }
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                Self::already_exists("Record already exists").with_source(error)
            }
            sqlx::Error::Database(db_error) if db_error.is_check_violation() => {
                Self::invalid_input("Value violates a database constraint").with_source(error)
            }
            _ => Self::database(format!("Database operation failed: {error}")).with_source(error),
        }
    }
}
