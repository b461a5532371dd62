// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! OpenAI chat completions provider

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::llm::provider::{ChatReply, ChatRequest, LlmProvider};
use crate::llm::providers::common;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(api_key, OPENAI_API_URL)
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
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
        common::send_chat_request(&self.client, &self.url, &self.api_key, &request).await
    }
}
