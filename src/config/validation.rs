// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Startup configuration audit
//!
//! Produces a list of human-readable problems. The audit is advisory: a
//! non-empty result is surfaced to the user but does not block startup.
//! Initialization fails only at the point a provider call is attempted
//! without a usable key.

use crate::config::settings::Settings;
use crate::llm::provider::Provider;
use crate::security::validation::{
    validate_api_key, validate_max_tokens, validate_model, validate_temperature,
};

/// Audit the settings, returning one message per problem.
///
/// An empty result means the configuration is fully usable.
pub fn validate_settings(settings: &Settings) -> Vec<String> {
    let mut errors = Vec::new();

    let parsed_provider: Option<Provider> = settings.provider.parse().ok();
    if settings.provider.is_empty() {
        errors.push("Provider not specified".to_string());
    } else if parsed_provider.is_none() {
        errors.push("Provider must be 'openai' or 'perplexity'".to_string());
    }

    // Key checks run against the effective provider; a missing provider
    // field falls back to openai, an unknown one skips the key check.
    let effective = if settings.provider.is_empty() {
        Some(Provider::Openai)
    } else {
        parsed_provider
    };

    if let Some(provider) = effective {
        let api_key = match provider {
            Provider::Openai => &settings.openai_api_key,
            Provider::Perplexity => &settings.perplexity_api_key,
        };
        if api_key.is_empty() {
            errors.push(format!("{} API key not set", provider.display_name()));
        } else if !validate_api_key(api_key, provider) {
            errors.push(format!(
                "Invalid {} API key format",
                provider.display_name()
            ));
        }
    }

    if !settings.model.is_empty() {
        let model_ok = effective
            .map(|p| validate_model(&settings.model, p))
            .unwrap_or(false);
        if !model_ok {
            let provider_label = if settings.provider.is_empty() {
                Provider::Openai.as_str()
            } else {
                settings.provider.as_str()
            };
            errors.push(format!(
                "Invalid model '{}' for provider '{}'",
                settings.model, provider_label
            ));
        }
    }

    if let Err(e) = validate_temperature(settings.temperature) {
        errors.push(e.to_string());
    }

    if let Err(e) = validate_max_tokens(i64::from(settings.max_tokens)) {
        errors.push(e.to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_openai_settings() -> Settings {
        Settings {
            provider: "openai".to_string(),
            openai_api_key: format!("sk-{}", "a".repeat(48)),
            ..Settings::default()
        }
    }

    #[test]
    fn test_valid_settings_produce_no_errors() {
        assert!(validate_settings(&valid_openai_settings()).is_empty());
    }

    #[test]
    fn test_missing_provider() {
        let mut settings = valid_openai_settings();
        settings.provider = String::new();

        let errors = validate_settings(&settings);
        assert_eq!(errors, vec!["Provider not specified".to_string()]);
    }

    #[test]
    fn test_unknown_provider() {
        let mut settings = valid_openai_settings();
        settings.provider = "anthropic".to_string();

        let errors = validate_settings(&settings);
        assert!(errors.contains(&"Provider must be 'openai' or 'perplexity'".to_string()));
    }

    #[test]
    fn test_perplexity_without_key_reports_exactly_one_error() {
        let settings = Settings {
            provider: "perplexity".to_string(),
            model: Provider::Perplexity.default_model().to_string(),
            ..Settings::default()
        };

        let errors = validate_settings(&settings);
        assert_eq!(errors, vec!["Perplexity API key not set".to_string()]);
    }

    #[test]
    fn test_malformed_key_reports_format_error() {
        let mut settings = valid_openai_settings();
        settings.openai_api_key = "sk-tooshort".to_string();

        let errors = validate_settings(&settings);
        assert_eq!(errors, vec!["Invalid OpenAI API key format".to_string()]);
    }

    #[test]
    fn test_model_mismatch() {
        let mut settings = valid_openai_settings();
        settings.model = "llama-3.1-sonar-small-128k-online".to_string();

        let errors = validate_settings(&settings);
        assert_eq!(
            errors,
            vec!["Invalid model 'llama-3.1-sonar-small-128k-online' for provider 'openai'"
                .to_string()]
        );
    }

    #[test]
    fn test_out_of_range_parameters() {
        let mut settings = valid_openai_settings();
        settings.temperature = 2.5;
        settings.max_tokens = 0;

        let errors = validate_settings(&settings);
        assert!(errors.contains(&"Temperature must be between 0.0 and 2.0".to_string()));
        assert!(errors.contains(&"Max tokens must be between 1 and 100000".to_string()));
    }

    #[test]
    fn test_errors_accumulate() {
        let settings = Settings {
            provider: "perplexity".to_string(),
            model: "gpt-4".to_string(),
            temperature: -1.0,
            ..Settings::default()
        };

        let errors = validate_settings(&settings);
        assert_eq!(errors.len(), 3);
    }
}
