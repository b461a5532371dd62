// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Shared wire code for the OpenAI-compatible chat completions endpoints.
//!
//! Both backends speak the same request/response shape, so the POST, the
//! status-to-error mapping, and the first-choice extraction live here.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ChatApiError, Result};
use crate::llm::message::ChatMessage;
use crate::llm::provider::{ChatReply, ChatRequest, Usage};

/// Hard cap on a single provider request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: String,
}

/// Build an HTTP client with the request timeout applied.
pub(crate) fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// POST one chat completion request and extract the first choice.
pub(crate) async fn send_chat_request(
    client: &Client,
    url: &str,
    api_key: &str,
    request: &ChatRequest,
) -> Result<ChatReply> {
    let body = WireRequest {
        model: &request.model,
        messages: &request.messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    };

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(parse_error(status, &body));
    }

    let parsed: WireResponse = response
        .json()
        .await
        .map_err(|e| ChatApiError::Api(ApiError::InvalidResponse(e.to_string())))?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        ChatApiError::Api(ApiError::InvalidResponse(
            "no choices in response".to_string(),
        ))
    })?;

    Ok(ChatReply {
        content: choice.message.content,
        model: parsed.model.unwrap_or_else(|| request.model.clone()),
        usage: parsed.usage,
    })
}

fn map_transport_error(error: reqwest::Error) -> ChatApiError {
    if error.is_timeout() {
        ChatApiError::Api(ApiError::Timeout)
    } else {
        ChatApiError::Api(ApiError::Network(error.to_string()))
    }
}

/// Map a non-success status plus body to an ApiError.
pub(crate) fn parse_error(status: u16, body: &str) -> ChatApiError {
    match status {
        401 | 403 => ChatApiError::Api(ApiError::AuthenticationFailed),
        429 => ChatApiError::Api(ApiError::RateLimited),
        _ => ChatApiError::Api(ApiError::ServerError {
            status,
            message: extract_error_message(body),
        }),
    }
}

/// Pull `error.message` out of a JSON error body, falling back to a
/// truncated copy of the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
