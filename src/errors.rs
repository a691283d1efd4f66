// ABOUTME: Re-exports the unified error types from cookbook-core
// ABOUTME: Handlers and managers import errors from here for a single type identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

pub use cookbook_core::errors::*;
