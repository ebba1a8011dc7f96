//! Application wiring between configuration, the model registry and a backend.

use crate::ai::{GeminiChatClient, ModelBackend};
use crate::models::{parse_context, Config, StructuredItem};
use crate::registry::{find_model, list_models, ModelDescriptor};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub struct App {
    backend: Arc<dyn ModelBackend>,
    models: Vec<ModelDescriptor>,
}

impl App {
    /// Build an app from a concrete backend and model list.
    ///
    /// This is primarily useful for integration tests that need to inject mocks.
    pub fn with_backend(backend: Arc<dyn ModelBackend>, models: Vec<ModelDescriptor>) -> Self {
        Self { backend, models }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        Ok(Self::from_config(&Config::from_env()?))
    }

    pub fn from_config(config: &Config) -> Self {
        let models = list_models(config);
        info!(
            "Loaded {} Gemini models (timeout {}s)",
            models.len(),
            config.request_timeout.as_secs()
        );
        Self::with_backend(Arc::new(GeminiChatClient::new(config)), models)
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn backend(&self) -> Arc<dyn ModelBackend> {
        self.backend.clone()
    }

    pub fn model(&self, name: &str) -> Result<&ModelDescriptor> {
        find_model(&self.models, name).ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Send raw host context to the named model.
    ///
    /// Malformed entries are dropped before translation.
    pub async fn send(&self, model_name: &str, context: &[Value]) -> Result<Vec<StructuredItem>> {
        let model = self.model(model_name)?;
        self.backend.ensure_ready()?;

        let items = parse_context(context);
        info!("Sending {} items to {}", items.len(), model.name);
        self.backend.send_context(&items, model).await
    }
}
