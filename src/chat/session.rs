// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! One chat turn: validate, build the window, dispatch with retry, commit.
//!
//! Ordering invariant: history is only mutated after a successful dispatch.
//! A validation rejection or an exhausted retry never appears in the log.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::settings::Settings;
use crate::error::{ChatApiError, Result};
use crate::history::HistoryStore;
use crate::llm::message::{ChatMessage, Role};
use crate::llm::provider::{ChatReply, ChatRequest, LlmProvider};
use crate::llm::retry::{with_retry, RetryPolicy};
use crate::security::validation::validate_message;

/// How many prior turns are carried into each request window.
const HISTORY_WINDOW: usize = 10;

/// Drives one conversation against a single provider.
pub struct ChatSession {
    settings: Settings,
    provider: Arc<dyn LlmProvider>,
    history: HistoryStore,
    retry: RetryPolicy,
}

impl ChatSession {
    pub fn new(
        settings: Settings,
        provider: Arc<dyn LlmProvider>,
        history: HistoryStore,
    ) -> Self {
        Self {
            settings,
            provider,
            history,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy (tests use short delays)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Clear the conversation log and persist the empty state
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Process one user message and return the assistant reply.
    ///
    /// A validation failure returns before any network call. A dispatch
    /// failure is retried per the policy and then surfaced as a
    /// ProviderExhausted error; in both cases history is untouched. On
    /// success the user turn is committed before the assistant turn, as
    /// two separate writes.
    pub async fn send(&mut self, message: &str) -> Result<ChatReply> {
        let validated = validate_message(message)?;

        let request = self.build_request(&validated);
        debug!(
            model = %request.model,
            window = request.messages.len(),
            "dispatching chat request"
        );

        let provider = Arc::clone(&self.provider);
        let reply = with_retry(
            || provider.send_chat(request.clone()),
            &self.retry,
            provider.name(),
        )
        .await
        .map_err(|e| ChatApiError::ProviderExhausted {
            provider: provider.name().to_string(),
            attempts: self.retry.max_attempts,
            message: e.to_string(),
        })?;

        self.history.append(Role::User, validated);
        self.history.append(Role::Assistant, reply.content.clone());
        info!(model = %reply.model, "chat turn committed");

        Ok(reply)
    }

    /// System prompt, then the recent window, then the new user message.
    fn build_request(&self, validated: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(ChatMessage::system(&self.settings.system_prompt));
        for turn in self.history.recent(HISTORY_WINDOW) {
            messages.push(ChatMessage {
                role: turn.role,
                content: turn.content.clone(),
            });
        }
        messages.push(ChatMessage::user(validated));

        ChatRequest::new(self.settings.model.clone(), messages)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
    }
}
