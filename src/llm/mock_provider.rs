// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Mock provider for testing
//!
//! Returns queued outcomes in order and records every request it receives.
//! When the queue is empty it falls back to a canned success.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ChatApiError, Result};
use crate::llm::provider::{ChatReply, ChatRequest, LlmProvider, Usage};

/// One scripted outcome for the mock
pub enum MockOutcome {
    Success(String),
    Failure(ChatApiError),
}

/// Configurable mock implementation of [`LlmProvider`]
pub struct MockProvider {
    name: String,
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_name("mock")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply
    pub fn queue_response(&self, content: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(content.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: ChatApiError) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Failure(error));
    }

    /// Number of send_chat calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match self.outcomes.lock().unwrap().pop_front() {
            Some(MockOutcome::Success(content)) => Ok(ChatReply {
                content,
                model: request.model,
                usage: Some(Usage::default()),
            }),
            Some(MockOutcome::Failure(error)) => Err(error),
            None => Ok(ChatReply {
                content: "mock response".to_string(),
                model: request.model,
                usage: Some(Usage::default()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::llm::message::ChatMessage;

    fn request() -> ChatRequest {
        ChatRequest::new("test-model", vec![ChatMessage::user("hi")])
    }

    #[tokio::test]
    async fn test_mock_returns_queued_responses_in_order() {
        let mock = MockProvider::new();
        mock.queue_response("first");
        mock.queue_response("second");

        assert_eq!(mock.send_chat(request()).await.unwrap().content, "first");
        assert_eq!(mock.send_chat(request()).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn test_mock_default_response_when_queue_empty() {
        let mock = MockProvider::new();
        let reply = mock.send_chat(request()).await.unwrap();
        assert_eq!(reply.content, "mock response");
    }

    #[tokio::test]
    async fn test_mock_returns_queued_error() {
        let mock = MockProvider::new();
        mock.queue_error(ChatApiError::Api(ApiError::Timeout));

        let result = mock.send_chat(request()).await;
        assert!(matches!(result, Err(ChatApiError::Api(ApiError::Timeout))));
    }

    #[tokio::test]
    async fn test_mock_counts_calls_and_records_requests() {
        let mock = MockProvider::new();
        mock.send_chat(request()).await.unwrap();
        mock.send_chat(request()).await.unwrap();

        assert_eq!(mock.call_count(), 2);
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "test-model");
    }
}
