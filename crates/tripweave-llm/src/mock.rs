//! Scripted backend shared by the crate's tests.

use crate::client::{ChatBackend, GenerationOptions};
use crate::error::GenerationError;
use crate::types::{ChatResponse, Choice, Message};
use std::sync::Mutex;

/// Mock backend that returns a sequence of scripted outcomes.
pub(crate) struct MockBackend {
    responses: Mutex<Vec<Result<String, GenerationError>>>,
    pub(crate) calls: Mutex<Vec<Vec<Message>>>,
}

impl MockBackend {
    pub(crate) fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn single(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    pub(crate) fn failing(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ChatBackend for MockBackend {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        _options: &GenerationOptions,
    ) -> Result<ChatResponse, GenerationError> {
        self.calls.lock().unwrap().push(messages);
        let mut responses = self.responses.lock().unwrap();
        let text = if responses.is_empty() {
            String::new()
        } else {
            responses.remove(0)?
        };
        Ok(ChatResponse {
            id: "mock".to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(text),
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        })
    }
}
