//! Scripted LLM client for tests and offline runs.

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::types::{MessageRequest, MessageResponse};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Mock provider that replays queued replies and records every request.
///
/// Replies are consumed in order. Once the queue is empty the client
/// answers with the fallback reply when one is set, otherwise with
/// `LlmError::Exhausted`.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<Result<MessageResponse, LlmError>>>,
    requests: Mutex<Vec<MessageRequest>>,
    fallback: Option<MessageResponse>,
}

impl MockLlmClient {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always answers with the same text.
    pub fn with_fallback_text(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(MessageResponse::text_reply(text)),
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub fn push_response(&self, response: MessageResponse) -> &Self {
        self.lock_replies().push_back(Ok(response));
        self
    }

    /// Queue a provider failure.
    pub fn push_error(&self, error: LlmError) -> &Self {
        self.lock_replies().push_back(Err(error));
        self
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<MessageRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<MessageResponse, LlmError>>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, LlmError> {
        let call_index = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(request.clone());
            requests.len()
        };

        tracing::debug!("Mock LLM call #{}", call_index);

        match self.lock_replies().pop_front() {
            Some(reply) => reply,
            None => self
                .fallback
                .clone()
                .ok_or(LlmError::Exhausted(call_index)),
        }
    }
}
