// ABOUTME: Core types and constants for the Cookbook recipe-sharing server
// ABOUTME: Foundation crate with error handling, pagination and validation limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

#![deny(unsafe_code)]

//! # Cookbook Core
//!
//! Foundation crate providing shared types and constants for the Cookbook
//! server. It changes rarely, which keeps incremental builds of the server
//! crate cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Field limits, pagination defaults and service names
//! - **pagination**: Page-number pagination envelope shared by list endpoints

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page-number pagination for list endpoints
pub mod pagination;
