use super::ModelBackend;
use crate::models::{ItemKind, StructuredItem};
use crate::registry::ModelDescriptor;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub struct MockBackend {
    responses: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<VecDeque<Error>>>,
    call_count: Arc<Mutex<usize>>,
    next_response: Arc<Mutex<usize>>,
    ready: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            next_response: Arc::new(Mutex::new(0)),
            ready: true,
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Queue an error; queued errors are returned before any canned response.
    pub fn with_error(self, error: Error) -> Self {
        self.errors.lock().unwrap().push_back(error);
        self
    }

    /// Make `ensure_ready` fail as if no API key were configured.
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn ensure_ready(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(Error::Config("GEMINI_API_KEY not set".to_string()))
        }
    }

    async fn send_context(
        &self,
        context: &[StructuredItem],
        _model: &ModelDescriptor,
    ) -> Result<Vec<StructuredItem>> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(error) = self.errors.lock().unwrap().pop_front() {
            return Err(error);
        }

        let responses = self.responses.lock().unwrap();
        let text = if responses.is_empty() {
            // Echo the last turn by default
            context
                .last()
                .map(|item| format!("Echo: {}", item.content))
                .unwrap_or_else(|| "Echo".to_string())
        } else {
            let mut next = self.next_response.lock().unwrap();
            let text = responses[*next % responses.len()].clone();
            *next += 1;
            text
        };

        Ok(vec![StructuredItem::new(ItemKind::AssistantResponse, text)])
    }
}
