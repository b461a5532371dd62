// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Provider trait and related types
//!
//! Defines the abstraction layer over the two chat backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ChatApiError, Result};
use crate::llm::message::ChatMessage;

/// The supported chat backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Openai,
    Perplexity,
}

impl Provider {
    /// Lowercase identifier used in config and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Perplexity => "perplexity",
        }
    }

    /// Human-readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Perplexity => "Perplexity",
        }
    }

    /// Environment variable consulted for this provider's API key
    pub fn env_key_var(&self) -> &'static str {
        match self {
            Provider::Openai => "OPENAI_API_KEY",
            Provider::Perplexity => "PERPLEXITY_API_KEY",
        }
    }

    /// Config field holding this provider's API key
    pub fn key_field(&self) -> &'static str {
        match self {
            Provider::Openai => "openai_api_key",
            Provider::Perplexity => "perplexity_api_key",
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Openai => "gpt-3.5-turbo",
            Provider::Perplexity => "llama-3.1-sonar-small-128k-online",
        }
    }

    /// Models accepted for this provider
    pub fn allowed_models(&self) -> &'static [&'static str] {
        match self {
            Provider::Openai => &[
                "gpt-3.5-turbo",
                "gpt-3.5-turbo-16k",
                "gpt-4",
                "gpt-4-32k",
                "gpt-4-turbo",
                "gpt-4o",
                "gpt-4o-mini",
            ],
            Provider::Perplexity => &[
                "llama-3.1-sonar-small-128k-online",
                "llama-3.1-sonar-large-128k-online",
                "llama-3.1-sonar-huge-128k-online",
                "llama-3.1-sonar-small-128k-chat",
                "llama-3.1-sonar-large-128k-chat",
                "llama-3.1-sonar-huge-128k-chat",
            ],
        }
    }
}

impl FromStr for Provider {
    type Err = ChatApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(Provider::Openai),
            "perplexity" => Ok(Provider::Perplexity),
            _ => Err(ChatApiError::Config(
                "Provider must be 'openai' or 'perplexity'".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main trait for chat providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "perplexity")
    fn name(&self) -> &str;

    /// Send one chat completion request and return the reply
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply>;
}

impl std::fmt::Debug for dyn LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProvider")
            .field("name", &self.name())
            .finish()
    }
}

/// A chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model to use
    pub model: String,

    /// Messages in the conversation window, oldest first
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens in the response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,
}

impl ChatRequest {
    /// Create a new request with default sampling parameters
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Reply to a chat completion request
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Assistant message content
    pub content: String,

    /// Model that produced the reply
    pub model: String,

    /// Token usage, when the backend reports it
    pub usage: Option<Usage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
