// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! CLI module
//!
//! Handles command-line argument parsing and command dispatch.

pub mod args;
pub mod commands;

pub use args::*;
