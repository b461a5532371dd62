// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Error types for the chat client
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

use crate::security::secrets::SecretError;
use crate::security::validation::ValidationError;

/// Main error type for chat client operations
#[derive(Error, Debug)]
pub enum ChatApiError {
    /// API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input or parameter validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Secret storage errors (key file, encryption)
    #[error("Secret storage error: {0}")]
    Secret(#[from] SecretError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider call that failed after exhausting all retry attempts
    #[error("Error communicating with {provider} after {attempts} attempts: {message}")]
    ProviderExhausted {
        provider: String,
        attempts: u32,
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Rate limited by the API
    #[error("Rate limited by the API")]
    RateLimited,

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,
}

/// Result type alias for chat client operations
pub type Result<T> = std::result::Result<T, ChatApiError>;

impl From<toml::de::Error> for ChatApiError {
    fn from(err: toml::de::Error) -> Self {
        ChatApiError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ChatApiError {
    fn from(err: toml::ser::Error) -> Self {
        ChatApiError::Toml(err.to_string())
    }
}
