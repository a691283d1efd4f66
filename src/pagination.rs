// ABOUTME: Re-exports pagination types from cookbook-core
// ABOUTME: PageRequest and Page are shared by every paginated list endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

pub use cookbook_core::pagination::*;
