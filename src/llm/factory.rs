// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Provider factory
//!
//! Centralizes provider construction so the session and CLI layers share
//! the same credential checks.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::{ChatApiError, Result};
use crate::llm::provider::{LlmProvider, Provider};
use crate::llm::providers::{OpenAiProvider, PerplexityProvider};

/// Factory for creating chat providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider selected by the settings.
    ///
    /// Fails with a Config error when the selected provider has no usable
    /// API key; callers treat that as fatal since no chat can proceed.
    pub fn create(settings: &Settings) -> Result<Arc<dyn LlmProvider>> {
        let provider = settings.resolved_provider();
        let api_key = settings.api_key_for(provider).ok_or_else(|| {
            ChatApiError::Config(format!(
                "No {} API key found. Set {} env var or run 'chatapi config set {}'.",
                provider.display_name(),
                provider.env_key_var(),
                provider.key_field(),
            ))
        })?;

        match provider {
            Provider::Openai => Ok(Arc::new(OpenAiProvider::new(api_key)?)),
            Provider::Perplexity => Ok(Arc::new(PerplexityProvider::new(api_key)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn openai_key() -> String {
        format!("sk-{}", "a".repeat(48))
    }

    #[test]
    fn test_create_openai_provider() {
        let mut settings = Settings::default();
        settings.provider = "openai".to_string();
        settings.openai_api_key = openai_key();

        let provider = ProviderFactory::create(&settings).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_perplexity_provider() {
        let mut settings = Settings::default();
        settings.provider = "perplexity".to_string();
        settings.perplexity_api_key = format!("pplx-{}", "b".repeat(40));

        let provider = ProviderFactory::create(&settings).unwrap();
        assert_eq!(provider.name(), "perplexity");
    }

    #[test]
    fn test_create_without_key_fails() {
        let mut settings = Settings::default();
        settings.provider = "perplexity".to_string();
        settings.perplexity_api_key = String::new();

        let err = ProviderFactory::create(&settings).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("Perplexity"));
        assert!(rendered.contains("PERPLEXITY_API_KEY"));
    }
}
