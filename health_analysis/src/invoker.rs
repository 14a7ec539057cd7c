//! Calls to the hosted language model.
//!
//! This is the only place where user data leaves the service. A request
//! carries the rendered prompt (which embeds every health field the user
//! entered), the model name and the API key. The key is sent as a header and
//! never appears in a URL. Prompts and completions are not logged.

use crate::error::TransportError;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Provider {
    /// Google `generateContent` API.
    #[default]
    #[serde(rename = "gemini")]
    Gemini,
    /// Any OpenAI compatible `/chat/completions` API.
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-pro",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }
}

pub trait ModelInvoker {
    /// Sends one prompt and returns the completion text. Single attempt.
    fn invoke(&self, prompt: &str) -> impl Future<Output = Result<String, TransportError>> + Send;
}

pub struct LlmClient {
    client: Client,
    provider: Provider,
    base_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    pub fn new(
        provider: Provider,
        base_url: &str,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(LlmClient {
            client: Client::builder().timeout(timeout).build()?,
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn request(&self, prompt: &str) -> RequestBuilder {
        match self.provider {
            Provider::Gemini => self
                .client
                .post(format!(
                    "{}/models/{}:generateContent",
                    self.base_url, self.model
                ))
                .header("x-goog-api-key", &self.api_key)
                .json(&json!({
                    "contents": [{"parts": [{"text": prompt}]}],
                })),
            Provider::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": self.model,
                    "messages": vec![json!({"role": "user", "content": prompt})],
                    "temperature": 0,
                })),
        }
    }
}

impl ModelInvoker for LlmClient {
    async fn invoke(&self, prompt: &str) -> Result<String, TransportError> {
        debug!(
            "sending {} byte prompt to {:?} model {}",
            prompt.len(),
            self.provider,
            self.model
        );
        let response = self.request(prompt).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|_| TransportError::Envelope("response body is not JSON"))?;

        completion_text(self.provider, &body)
            .map(str::to_string)
            .ok_or(match self.provider {
                Provider::Gemini => {
                    TransportError::Envelope("candidates[0].content.parts[0].text not found")
                }
                Provider::OpenAi => {
                    TransportError::Envelope("choices[0].message.content not found")
                }
            })
    }
}

/// Pulls the completion text out of a provider response body.
pub fn completion_text(provider: Provider, body: &Value) -> Option<&str> {
    match provider {
        Provider::Gemini => body["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        Provider::OpenAi => body["choices"][0]["message"]["content"].as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Upstream, spawn_upstream};
    use axum::http::StatusCode;

    fn client(provider: Provider, base_url: &str) -> LlmClient {
        LlmClient::new(
            provider,
            base_url,
            "test-key".into(),
            provider.default_model().into(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn reads_text_from_both_envelopes() {
        let gemini = json!({"candidates": [{"content": {"parts": [{"text": "{\"a\":1}"}]}}]});
        assert_eq!(completion_text(Provider::Gemini, &gemini), Some("{\"a\":1}"));

        let openai = json!({"choices": [{"message": {"role": "assistant", "content": "hello"}}]});
        assert_eq!(completion_text(Provider::OpenAi, &openai), Some("hello"));

        assert_eq!(completion_text(Provider::Gemini, &openai), None);
        assert_eq!(completion_text(Provider::OpenAi, &json!({"choices": []})), None);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = client(Provider::Gemini, "http://localhost");
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[tokio::test]
    async fn gemini_call_returns_completion_text() {
        let upstream = spawn_upstream(Upstream::completion("{\"riskLevel\": \"low\"}")).await;
        let text = client(Provider::Gemini, &upstream.base_url)
            .invoke("prompt")
            .await
            .unwrap();

        assert_eq!(text, "{\"riskLevel\": \"low\"}");
        let seen = upstream.last_request().unwrap();
        assert_eq!(seen.path, "/models/gemini-pro:generateContent");
        assert_eq!(seen.api_key.as_deref(), Some("test-key"));
        assert_eq!(seen.body["contents"][0]["parts"][0]["text"], json!("prompt"));
    }

    #[tokio::test]
    async fn openai_call_returns_completion_text() {
        let upstream = spawn_upstream(Upstream::completion("plain words")).await;
        let text = client(Provider::OpenAi, &format!("{}/", upstream.base_url))
            .invoke("prompt")
            .await
            .unwrap();

        assert_eq!(text, "plain words");
        let seen = upstream.last_request().unwrap();
        assert_eq!(seen.path, "/chat/completions");
        assert_eq!(seen.bearer.as_deref(), Some("test-key"));
        assert_eq!(seen.body["messages"][0]["content"], json!("prompt"));
        assert_eq!(seen.body["temperature"], json!(0));
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let upstream = spawn_upstream(Upstream::Status(StatusCode::TOO_MANY_REQUESTS)).await;
        let err = client(Provider::Gemini, &upstream.base_url)
            .invoke("prompt")
            .await
            .unwrap_err();

        match err {
            TransportError::Status { status, .. } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_envelope_is_a_transport_error() {
        let upstream = spawn_upstream(Upstream::Body(json!({"promptFeedback": {}}))).await;
        let err = client(Provider::Gemini, &upstream.base_url)
            .invoke("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Envelope(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let err = client(Provider::OpenAi, &crate::test_support::unreachable_base_url().await)
            .invoke("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
