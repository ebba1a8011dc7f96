use super::types::RequestPayload;
use crate::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Lightweight Gemini REST transport: one POST, one decoded JSON reply.
pub struct GeminiHttpClient {
    client: Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: Option<String>, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout,
        }
    }

    /// Returns the API key, or a configuration error when none is set.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))
    }

    /// POST `payload` to `url` with the API key as the `key` query parameter.
    ///
    /// Fails before touching the network when no key is configured. Any JSON
    /// body is returned as-is, including `{error}` bodies sent with non-2xx
    /// statuses, so the caller's translator sees provider errors verbatim.
    pub async fn send_request(&self, url: &str, payload: &RequestPayload) -> Result<Value> {
        let api_key = self.api_key()?;
        let body = serde_json::to_vec(payload)?;

        tracing::debug!("Sending generateContent request to {}", url);

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        let parsed = serde_json::from_str::<Value>(&text);
        if status.is_success() {
            return parsed.map_err(|e| {
                tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, text);
                Error::MalformedResponse(format!("response body is not JSON: {}", e))
            });
        }

        tracing::error!("Gemini API error (status {}): {}", status, text);
        match parsed {
            Ok(json) if json.get("error").is_some() => Ok(json),
            _ => Err(Error::Provider {
                message: if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text
                },
                code: Some(i64::from(status.as_u16())),
                status: status
                    .canonical_reason()
                    .map(|reason| reason.to_uppercase().replace(' ', "_")),
            }),
        }
    }

    // Request URLs carry the API key, so it is stripped before logging.
    fn transport_error(&self, error: reqwest::Error) -> Error {
        let error = error.without_url();
        tracing::error!("Failed to send request to Gemini: {}", error);
        if error.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Http(error)
        }
    }
}
