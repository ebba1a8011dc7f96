use super::client::GeminiHttpClient;
use super::translate::{build_request, translate_response};
use crate::ai::ModelBackend;
use crate::models::{Config, StructuredItem};
use crate::registry::ModelDescriptor;
use crate::Result;
use async_trait::async_trait;

/// Gemini implementation of [`ModelBackend`].
pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                config.api_key.clone(),
                config.request_timeout,
                client,
            ),
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiChatClient {
    fn ensure_ready(&self) -> Result<()> {
        self.http.api_key().map(|_| ())
    }

    async fn send_context(
        &self,
        context: &[StructuredItem],
        model: &ModelDescriptor,
    ) -> Result<Vec<StructuredItem>> {
        let payload = build_request(context, model)?;
        tracing::debug!(
            "Sending {} context items to {} ({})",
            context.len(),
            model.name,
            model.version
        );

        let response = self.http.send_request(&model.api_url, &payload).await?;
        let items = translate_response(response)?;

        tracing::debug!("Received {} candidates from {}", items.len(), model.name);
        Ok(items)
    }
}
