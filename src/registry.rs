//! Static registry of invocable Gemini model variants.

use crate::models::{Config, DEFAULT_BASE_URL};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const PROVIDER: &str = "Google";

/// Model versions offered by [`list_models`], in display order.
const MODEL_VERSIONS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
];

/// Low-temperature variant offered alongside the defaults.
const PRECISE_VERSION: &str = "gemini-2.5-pro";
const PRECISE_TEMPERATURE: f64 = 0.2;

/// Generic role to Gemini role, used when a model does not override it.
pub fn default_role_mapping() -> BTreeMap<String, String> {
    [("system", "user"), ("assistant", "model"), ("user", "user")]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

/// Immutable description of one model variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    pub provider: &'static str,
    pub version: String,
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub role_mapping: BTreeMap<String, String>,
    pub rest_params: Map<String, Value>,
}

/// Optional settings for [`make_model`].
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub name: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub role_mapping: Option<BTreeMap<String, String>>,
    pub rest_params: Map<String, Value>,
    /// Host to target instead of the public Gemini endpoint.
    pub base_url: Option<String>,
}

/// Build the `generateContent` endpoint for a model version.
pub fn api_url(base_url: &str, version: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        version
    )
}

pub fn make_model(version: &str, options: ModelOptions) -> ModelDescriptor {
    let version = version.strip_prefix("models/").unwrap_or(version);

    let name = options.name.unwrap_or_else(|| match options.temperature {
        Some(temperature) => format!("{} {} (t{})", PROVIDER, version, temperature),
        None => format!("{} {}", PROVIDER, version),
    });
    let base_url = options.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

    ModelDescriptor {
        name,
        provider: PROVIDER,
        version: version.to_string(),
        api_url: api_url(base_url, version),
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        role_mapping: options.role_mapping.unwrap_or_else(default_role_mapping),
        rest_params: options.rest_params,
    }
}

/// List the configured model variants.
///
/// Descriptors inherit the configured token and temperature defaults unless a
/// variant pins its own temperature. Default variants carry an explicit plain
/// name, so only pinned temperatures show up in display names.
pub fn list_models(config: &Config) -> Vec<ModelDescriptor> {
    let base_options = || ModelOptions {
        max_tokens: Some(config.default_max_tokens),
        base_url: Some(config.base_url.clone()),
        ..ModelOptions::default()
    };

    let mut models: Vec<ModelDescriptor> = MODEL_VERSIONS
        .iter()
        .map(|version| {
            make_model(
                version,
                ModelOptions {
                    name: Some(format!("{} {}", PROVIDER, version)),
                    temperature: Some(config.default_temperature),
                    ..base_options()
                },
            )
        })
        .collect();

    models.push(make_model(
        PRECISE_VERSION,
        ModelOptions {
            temperature: Some(PRECISE_TEMPERATURE),
            ..base_options()
        },
    ));

    models
}

/// Find a descriptor by display name, falling back to the API version.
pub fn find_model<'a>(models: &'a [ModelDescriptor], name: &str) -> Option<&'a ModelDescriptor> {
    models
        .iter()
        .find(|model| model.name == name)
        .or_else(|| models.iter().find(|model| model.version == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_make_model_default_name_and_url() {
        let model = make_model("gemini-2.5-flash", ModelOptions::default());

        assert_eq!(model.name, "Google gemini-2.5-flash");
        assert_eq!(model.provider, "Google");
        assert_eq!(
            model.api_url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(model.temperature, None);
        assert_eq!(model.max_tokens, None);
        assert_eq!(model.role_mapping, default_role_mapping());
        assert!(model.rest_params.is_empty());
    }

    #[test]
    fn test_make_model_names_pinned_temperature() {
        let model = make_model(
            "gemini-2.5-pro",
            ModelOptions {
                temperature: Some(0.2),
                ..ModelOptions::default()
            },
        );
        assert_eq!(model.name, "Google gemini-2.5-pro (t0.2)");
    }

    #[test]
    fn test_make_model_explicit_name_wins() {
        let model = make_model(
            "gemini-2.5-pro",
            ModelOptions {
                name: Some("Pro".to_string()),
                temperature: Some(1.0),
                ..ModelOptions::default()
            },
        );
        assert_eq!(model.name, "Pro");
    }

    #[test]
    fn test_make_model_strips_models_prefix() {
        let model = make_model("models/gemini-2.0-flash", ModelOptions::default());
        assert_eq!(model.version, "gemini-2.0-flash");
        assert!(model.api_url.ends_with("/models/gemini-2.0-flash:generateContent"));
    }

    #[test]
    fn test_list_models_is_stable_and_well_formed() {
        let config = Config::default();
        let first = list_models(&config);
        let second = list_models(&config);

        assert!(!first.is_empty());
        assert_eq!(first, second);
        for model in &first {
            assert!(!model.api_url.is_empty());
            assert!(model.api_url.contains(&model.version));
            assert_eq!(model.max_tokens, Some(65536));
        }
    }

    #[test]
    fn test_list_models_applies_config_defaults() {
        let config = Config {
            default_temperature: 0.5,
            ..Config::default()
        }
        .with_base_url("http://127.0.0.1:9000");

        let models = list_models(&config);
        let flash = find_model(&models, "Google gemini-2.5-flash").unwrap();
        assert_eq!(flash.temperature, Some(0.5));
        assert!(flash.api_url.starts_with("http://127.0.0.1:9000/v1beta/"));

        let precise = find_model(&models, "Google gemini-2.5-pro (t0.2)").unwrap();
        assert_eq!(precise.temperature, Some(0.2));
    }

    #[test]
    fn test_list_models_matches_make_model() {
        let config = Config::default();
        let models = list_models(&config);

        let expected = make_model(
            "gemini-2.5-flash",
            ModelOptions {
                name: Some("Google gemini-2.5-flash".to_string()),
                max_tokens: Some(config.default_max_tokens),
                temperature: Some(config.default_temperature),
                base_url: Some(config.base_url.clone()),
                ..ModelOptions::default()
            },
        );
        assert_eq!(find_model(&models, "gemini-2.5-flash"), Some(&expected));

        let expected = make_model(
            "gemini-2.5-pro",
            ModelOptions {
                max_tokens: Some(config.default_max_tokens),
                temperature: Some(0.2),
                base_url: Some(config.base_url.clone()),
                ..ModelOptions::default()
            },
        );
        assert_eq!(models.last(), Some(&expected));
    }

    #[test]
    fn test_find_model_by_version() {
        let models = list_models(&Config::default());
        let model = find_model(&models, "gemini-2.5-flash-lite").unwrap();
        assert_eq!(model.name, "Google gemini-2.5-flash-lite");
        assert!(find_model(&models, "gpt-5").is_none());
    }
}
