// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Application settings schema
//!
//! Mirrors the on-disk config document. Every field has a serde default so
//! partial configs load cleanly; `provider` deliberately defaults to the
//! empty string when the field is absent, so the audit can tell "missing"
//! from "wrong".

use serde::{Deserialize, Serialize};

use crate::llm::provider::Provider;

/// Application settings, persisted as `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Selected backend: "openai" or "perplexity"
    #[serde(default)]
    pub provider: String,

    /// OpenAI API key (plaintext in memory, sealed on disk)
    #[serde(default)]
    pub openai_api_key: String,

    /// Perplexity API key (plaintext in memory, sealed on disk)
    #[serde(default)]
    pub perplexity_api_key: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, 0.0 to 2.0
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Response token cap, 1 to 100000
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System prompt prepended to every conversation window
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Whether turns are persisted to the history log
    #[serde(default = "default_save_history")]
    pub save_history: bool,

    /// Whether to print token usage after each reply
    #[serde(default)]
    pub show_tokens: bool,
}

fn default_model() -> String {
    Provider::Openai.default_model().to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_save_history() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::Openai.as_str().to_string(),
            openai_api_key: String::new(),
            perplexity_api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            save_history: default_save_history(),
            show_tokens: false,
        }
    }
}

impl Settings {
    /// Defaults for a fresh installation, seeded from the environment.
    ///
    /// `CHATAPI_PROVIDER` selects the backend, and any API keys already in
    /// the environment are copied into the config so the first save seals
    /// them.
    pub fn first_run() -> Self {
        let provider: Provider = std::env::var("CHATAPI_PROVIDER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Provider::Openai);

        Self {
            provider: provider.as_str().to_string(),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            perplexity_api_key: std::env::var("PERPLEXITY_API_KEY").unwrap_or_default(),
            model: provider.default_model().to_string(),
            ..Self::default()
        }
    }

    /// The configured provider, falling back to OpenAI when the field is
    /// missing or unparsable. The audit reports the mismatch separately.
    pub fn resolved_provider(&self) -> Provider {
        self.provider.parse().unwrap_or(Provider::Openai)
    }

    /// API key for a provider: environment first, then the stored value.
    /// Returns None when neither yields a non-empty key.
    pub fn api_key_for(&self, provider: Provider) -> Option<String> {
        if let Ok(key) = std::env::var(provider.env_key_var()) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        let stored = match provider {
            Provider::Openai => &self.openai_api_key,
            Provider::Perplexity => &self.perplexity_api_key,
        };
        if stored.is_empty() {
            None
        } else {
            Some(stored.clone())
        }
    }
}
