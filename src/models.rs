//! Data models and configuration
//!
//! Defines the structured context items exchanged with the host framework and
//! the immutable configuration the adapter is built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_TOKENS: u32 = 65536;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Semantic tag of a structured context item.
///
/// Tags the adapter does not know are kept verbatim in [`ItemKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    System,
    User,
    Assistant,
    AssistantResponse,
    FileContext,
    ProjectContext,
    Error,
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::System => "system",
            ItemKind::User => "user",
            ItemKind::Assistant => "assistant",
            ItemKind::AssistantResponse => "assistant-response",
            ItemKind::FileContext => "file-context",
            ItemKind::ProjectContext => "project-context",
            ItemKind::Error => "error",
            ItemKind::Other(tag) => tag,
        }
    }
}

impl From<&str> for ItemKind {
    fn from(tag: &str) -> Self {
        match tag {
            "system" => ItemKind::System,
            "user" => ItemKind::User,
            "assistant" => ItemKind::Assistant,
            "assistant-response" => ItemKind::AssistantResponse,
            "file-context" => ItemKind::FileContext,
            "project-context" => ItemKind::ProjectContext,
            "error" => ItemKind::Error,
            other => ItemKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemKind {
    fn from(tag: String) -> Self {
        ItemKind::from(tag.as_str())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged unit of conversation content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub content: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl StructuredItem {
    pub fn new(kind: ItemKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Read an item from the host's loosely shaped JSON.
    ///
    /// Accepts `type` or `role` as the tag. Returns `None` unless the value is
    /// an object with a non-empty string tag and a string `content`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let (tag_key, tag) = ["type", "role"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str).map(|t| (*key, t)))?;
        if tag.is_empty() {
            return None;
        }
        let content = object.get("content")?.as_str()?.to_string();

        let properties = object
            .iter()
            .filter(|(key, _)| key.as_str() != tag_key && key.as_str() != "content")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            kind: ItemKind::from(tag),
            content,
            properties,
        })
    }
}

/// Convert host JSON into structured items, dropping malformed entries.
pub fn parse_context(values: &[Value]) -> Vec<StructuredItem> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let item = StructuredItem::from_value(value);
            if item.is_none() {
                tracing::warn!("Dropping malformed context item at index {}", index);
            }
            item
        })
        .collect()
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_max_tokens: u32,
    pub default_temperature: f64,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            default_temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            base_url: lookup("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            default_max_tokens: parse_var(&lookup, "GEMINI_MAX_TOKENS")?
                .unwrap_or(defaults.default_max_tokens),
            default_temperature: parse_var(&lookup, "GEMINI_TEMPERATURE")?
                .unwrap_or(defaults.default_temperature),
            request_timeout: parse_var(&lookup, "GEMINI_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> crate::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| crate::Error::Config(format!("{} is invalid ({}): {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_item_kind_round_trips_known_and_unknown_tags() {
        assert_eq!(ItemKind::from("file-context"), ItemKind::FileContext);
        assert_eq!(ItemKind::from("assistant-response").as_str(), "assistant-response");
        assert_eq!(
            ItemKind::from("tool-output"),
            ItemKind::Other("tool-output".to_string())
        );
        assert_eq!(ItemKind::Other("tool-output".to_string()).as_str(), "tool-output");
    }

    #[test]
    fn test_item_serialization() {
        let item = StructuredItem::new(ItemKind::User, "hi").with_property("path", "src/lib.rs");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            json!({"type": "user", "content": "hi", "path": "src/lib.rs"})
        );

        let deserialized: StructuredItem = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, item);
    }

    #[test]
    fn test_from_value_accepts_role_tag() {
        let item = StructuredItem::from_value(&json!({"role": "assistant", "content": "ok"}))
            .unwrap();
        assert_eq!(item.kind, ItemKind::Assistant);
        assert_eq!(item.content, "ok");
        assert!(item.properties.is_empty());
    }

    #[test]
    fn test_parse_context_drops_malformed_items_in_order() {
        let values = vec![
            json!({"type": "system", "content": "be brief"}),
            json!("just a string"),
            json!({"type": "user"}),
            json!({"type": "", "content": "no tag"}),
            json!({"type": "user", "content": 42}),
            json!({"type": "user", "content": "question"}),
        ];

        let items = parse_context(&values);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ItemKind::System);
        assert_eq!(items[1].content, "question");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_max_tokens, 65536);
        assert_eq!(config.default_temperature, 0.7);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_BASE_URL", "http://localhost:8080/"),
            ("GEMINI_MAX_TOKENS", "1024"),
            ("GEMINI_TEMPERATURE", "0.2"),
            ("GEMINI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.default_max_tokens, 1024);
        assert_eq!(config.default_temperature, 0.2);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_treats_blank_key_as_unset() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(err.to_string().contains("GEMINI_TIMEOUT_SECS"));
    }
}
