// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Pure input validators applied before any request leaves the process.
//!
//! Every user-supplied value passes through here exactly once per turn. The
//! validators never touch the network or the filesystem, so a rejection is
//! guaranteed to have no side effects.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::llm::provider::Provider;

/// Maximum accepted message length after trimming, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Validation failures surfaced directly to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message too long (max {max} characters)")]
    MessageTooLong { max: usize },

    #[error("Message contains potentially unsafe content")]
    UnsafeContent,

    #[error("Temperature must be between 0.0 and 2.0")]
    TemperatureOutOfRange,

    #[error("Temperature must be a number")]
    TemperatureNotANumber,

    #[error("Max tokens must be between 1 and 100000")]
    MaxTokensOutOfRange,

    #[error("Max tokens must be an integer")]
    MaxTokensNotAnInteger,
}

fn openai_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^sk-[a-zA-Z0-9]{48}$").unwrap())
}

fn perplexity_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^pplx-[a-zA-Z0-9]{40}$").unwrap())
}

fn unsafe_content_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?is)<script.*?>.*?</script>",
            r"(?i)javascript:",
            r"(?i)data:text/html",
            r"(?i)vbscript:",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Check whether an API key matches the provider's expected shape.
///
/// Leading and trailing whitespace is ignored. This is a format check only;
/// a well-formed key can still be rejected by the provider.
pub fn validate_api_key(api_key: &str, provider: Provider) -> bool {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return false;
    }

    match provider {
        Provider::Openai => openai_key_pattern().is_match(api_key),
        Provider::Perplexity => perplexity_key_pattern().is_match(api_key),
    }
}

/// Validate and sanitize a user message, returning the trimmed text.
///
/// The unsafe-content check is a blocklist of markup injection patterns. It
/// only ever rejects; it does not rewrite the message beyond trimming.
pub fn validate_message(message: &str) -> Result<String, ValidationError> {
    let message = message.trim();

    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::MessageTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }

    for pattern in unsafe_content_patterns() {
        if pattern.is_match(message) {
            return Err(ValidationError::UnsafeContent);
        }
    }

    Ok(message.to_string())
}

/// Check whether a model name is allowed for the given provider.
pub fn validate_model(model: &str, provider: Provider) -> bool {
    !model.is_empty() && provider.allowed_models().contains(&model)
}

/// Validate a temperature value.
pub fn validate_temperature(temperature: f64) -> Result<f64, ValidationError> {
    if !temperature.is_finite() {
        return Err(ValidationError::TemperatureNotANumber);
    }
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ValidationError::TemperatureOutOfRange);
    }
    Ok(temperature)
}

/// Parse and validate a temperature from user-typed text.
pub fn parse_temperature(text: &str) -> Result<f64, ValidationError> {
    let temperature: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::TemperatureNotANumber)?;
    validate_temperature(temperature)
}

/// Validate a max_tokens value.
pub fn validate_max_tokens(max_tokens: i64) -> Result<u32, ValidationError> {
    if !(1..=100_000).contains(&max_tokens) {
        return Err(ValidationError::MaxTokensOutOfRange);
    }
    Ok(max_tokens as u32)
}

/// Parse and validate a max_tokens from user-typed text.
///
/// Fractional input is rejected rather than truncated.
pub fn parse_max_tokens(text: &str) -> Result<u32, ValidationError> {
    let max_tokens: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::MaxTokensNotAnInteger)?;
    validate_max_tokens(max_tokens)
}
