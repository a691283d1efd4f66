// ABOUTME: Re-exports application constants from cookbook-core
// ABOUTME: Keeps limit and naming constants identical across workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

pub use cookbook_core::constants::*;
