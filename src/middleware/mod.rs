// ABOUTME: HTTP middleware layers applied to the whole router
// ABOUTME: CORS policy and request tracing with request ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

/// CORS configuration
pub mod cors;
/// Request spans and `x-request-id` handling
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{create_request_span, REQUEST_ID_HEADER};
