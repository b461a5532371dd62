// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! ChatAPI CLI - command-line chat client for OpenAI and Perplexity.
//!
//! This crate exposes the runtime used by the `chatapi` binary
//! (`src/main.rs`).
//!
//! Architecture highlights:
//! - `chat`: conversation session, the validate-dispatch-commit cycle
//! - `llm`: provider abstraction, OpenAI/Perplexity implementations, retry
//! - `config`: settings schema, persistence, and the startup audit
//! - `security`: input/settings validation and at-rest key encryption
//! - `history`: the persisted conversation log

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod security;
pub mod utils;

pub use error::{ChatApiError, Result};
