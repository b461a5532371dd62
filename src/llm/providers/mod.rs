// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Concrete provider implementations.

pub mod common;
pub mod openai;
pub mod perplexity;

pub use openai::OpenAiProvider;
pub use perplexity::PerplexityProvider;
