//! Model backend integration
//!
//! Provides the backend interface the host framework sends context through,
//! the Gemini implementation of it, and a callback-style dispatcher.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiChatClient;
pub use mock::MockBackend;

use crate::models::StructuredItem;
use crate::registry::ModelDescriptor;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Checks that a request could be sent, without doing any I/O.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn send_context(
        &self,
        context: &[StructuredItem],
        model: &ModelDescriptor,
    ) -> Result<Vec<StructuredItem>>;
}

/// Send `context` in the background and report the outcome through callbacks.
///
/// Returns an error immediately, invoking neither callback, when the backend
/// is not ready or no tokio runtime is running. Otherwise exactly one of
/// `on_success` or `on_failure` runs once the request settles; failures are
/// delivered as `error`-tagged items.
pub fn dispatch<S, F>(
    backend: Arc<dyn ModelBackend>,
    context: Vec<StructuredItem>,
    model: ModelDescriptor,
    on_success: S,
    on_failure: F,
) -> Result<JoinHandle<()>>
where
    S: FnOnce(Vec<StructuredItem>) + Send + 'static,
    F: FnOnce(StructuredItem) + Send + 'static,
{
    backend.ensure_ready()?;
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| Error::Config(format!("no async runtime available: {}", e)))?;

    Ok(runtime.spawn(async move {
        match backend.send_context(&context, &model).await {
            Ok(items) => on_success(items),
            Err(e) => {
                tracing::error!("Request to {} failed: {}", model.name, e);
                on_failure(e.into_item());
            }
        }
    }))
}
