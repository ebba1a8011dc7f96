//! Conversion between structured context items and Gemini payloads.

use super::types::{Content, GenerateContentResponse, GenerationConfig, RequestPayload};
use crate::models::{ItemKind, StructuredItem};
use crate::registry::ModelDescriptor;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Built-in role for tags a model's mapping table does not cover.
fn fallback_role(kind: &ItemKind) -> Option<&'static str> {
    match kind {
        ItemKind::System
        | ItemKind::User
        | ItemKind::FileContext
        | ItemKind::ProjectContext => Some("user"),
        ItemKind::Assistant | ItemKind::AssistantResponse => Some("model"),
        ItemKind::Error | ItemKind::Other(_) => None,
    }
}

/// Resolve the Gemini role for an item kind.
///
/// Lookup order: the model's table by exact tag, the built-in table, then the
/// tag itself.
pub fn provider_role(kind: &ItemKind, role_mapping: &BTreeMap<String, String>) -> String {
    role_mapping
        .get(kind.as_str())
        .cloned()
        .or_else(|| fallback_role(kind).map(str::to_string))
        .unwrap_or_else(|| kind.as_str().to_string())
}

pub fn to_provider_messages(
    items: &[StructuredItem],
    role_mapping: &BTreeMap<String, String>,
) -> Vec<Content> {
    items
        .iter()
        .map(|item| Content::text(provider_role(&item.kind, role_mapping), item.content.clone()))
        .collect()
}

/// Assemble the `generateContent` body for a model.
///
/// `generationConfig` is present only when the model defines a temperature or
/// token limit. The model's extra parameters are merged last and may replace
/// any top-level field.
pub fn build_request(items: &[StructuredItem], model: &ModelDescriptor) -> Result<RequestPayload> {
    let mut payload = Map::new();
    payload.insert(
        "contents".to_string(),
        serde_json::to_value(to_provider_messages(items, &model.role_mapping))?,
    );

    if model.temperature.is_some() || model.max_tokens.is_some() {
        let generation_config = GenerationConfig {
            max_output_tokens: model.max_tokens,
            temperature: model.temperature,
        };
        payload.insert(
            "generationConfig".to_string(),
            serde_json::to_value(generation_config)?,
        );
    }

    payload.extend(model.rest_params.clone());
    Ok(RequestPayload(payload))
}

/// Translate a decoded `generateContent` response into structured items.
///
/// An `error` object becomes [`Error::Provider`]. Each candidate yields one
/// `assistant-response` item holding the text of its first part; a candidate
/// without that text is a [`Error::MalformedResponse`].
pub fn translate_response(response: Value) -> Result<Vec<StructuredItem>> {
    let response: GenerateContentResponse = serde_json::from_value(response)
        .map_err(|e| Error::MalformedResponse(format!("unexpected response shape: {}", e)))?;

    if let Some(error) = response.error {
        return Err(Error::Provider {
            message: error.message,
            code: error.code,
            status: error.status,
        });
    }

    let candidates = match response.candidates {
        Some(candidates) => candidates,
        None => {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(Error::Provider {
                    message: format!("Prompt blocked: {}", reason),
                    code: None,
                    status: Some("BLOCKED".to_string()),
                });
            }
            return Err(Error::MalformedResponse(
                "response has neither candidates nor error".to_string(),
            ));
        }
    };

    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let text = candidate
                .content
                .and_then(|content| content.parts)
                .map(|parts| parts.into_vec())
                .and_then(|parts| parts.into_iter().next())
                .and_then(|part| part.text)
                .ok_or_else(|| {
                    Error::MalformedResponse(format!("candidate {} has no text part", index))
                })?;
            Ok(StructuredItem::new(ItemKind::AssistantResponse, text))
        })
        .collect()
}
