// ABOUTME: Axum response conversion for the unified error type
// ABOUTME: Renders AppError as a JSON envelope with the mapped status code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use super::{AppError, ErrorResponse};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            tracing::error!(
                code = ?self.code,
                source = ?self.source,
                "Request failed: {}",
                self.message
            );
        } else {
            tracing::debug!(code = ?self.code, "Request rejected: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::not_found("Recipe").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_maps_to_400() {
        let response = AppError::already_exists("Recipe is already in favorites").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
