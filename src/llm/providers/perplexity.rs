// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Perplexity chat completions provider
//!
//! Perplexity exposes an OpenAI-compatible endpoint, so only the URL and
//! key differ from the OpenAI binding.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::llm::provider::{ChatReply, ChatRequest, LlmProvider};
use crate::llm::providers::common;

const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";

pub struct PerplexityProvider {
    client: Client,
    api_key: String,
    url: String,
}

impl PerplexityProvider {
    /// Create a new Perplexity provider
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(api_key, PERPLEXITY_API_URL)
    }

    /// Create with a custom endpoint URL (used by tests and proxies)
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: common::build_client()?,
            api_key: api_key.into(),
            url: url.into(),
        })
    }
}

#[async_trait]
impl LlmProvider for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
        common::send_chat_request(&self.client, &self.url, &self.api_key, &request).await
    }
}
