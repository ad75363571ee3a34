//! Yandex Foundation Models completion client
//!
//! Talks to the text-completion REST endpoint with an API key. One
//! `complete` call issues exactly one request; timeouts are enforced by
//! the underlying HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::llm::gateway::{CompletionGateway, GatewayError};

const COMPLETION_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default completion model
pub const DEFAULT_MODEL: &str = "yandexgpt-lite";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2000;

/// Completion request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    model_uri: &'a str,
    completion_options: CompletionOptions,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    text: &'a str,
}

/// Completion response body (the fields we consume)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: CompletionResult,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: AlternativeMessage,
}

#[derive(Debug, Deserialize)]
struct AlternativeMessage {
    text: String,
}

/// Yandex Foundation Models API client
pub struct YCloudClient {
    http_client: reqwest::Client,
    api_key: String,
    model_uri: String,
}

impl YCloudClient {
    /// Create a client for `gpt://<folder_id>/<model>/latest`
    pub fn new(folder_id: &str, api_key: String, model: &str) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model_uri: format!("gpt://{}/{}/latest", folder_id, model),
        })
    }

    /// The model URI requests are issued against
    pub fn model_uri(&self) -> &str {
        &self.model_uri
    }
}

#[async_trait]
impl CompletionGateway for YCloudClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GatewayError> {
        let body = CompletionRequest {
            model_uri: &self.model_uri,
            completion_options: CompletionOptions {
                stream: false,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            },
            messages: vec![
                Message { role: "system", text: system_prompt },
                Message { role: "user", text: user_text },
            ],
        };

        tracing::debug!(model_uri = %self.model_uri, "Issuing completion request");

        let response = self
            .http_client
            .post(COMPLETION_URL)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GatewayError::AuthRejected);
        }

        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let alternative = completion
            .result
            .alternatives
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyCompletion)?;

        Ok(alternative.message.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_uri_is_built_from_folder_and_model() {
        let client = YCloudClient::new("b1gexample", "key".to_string(), DEFAULT_MODEL).unwrap();
        assert_eq!(client.model_uri(), "gpt://b1gexample/yandexgpt-lite/latest");
    }

    #[test]
    fn request_body_serializes_to_api_shape() {
        let body = CompletionRequest {
            model_uri: "gpt://folder/yandexgpt-lite/latest",
            completion_options: CompletionOptions {
                stream: false,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            },
            messages: vec![
                Message { role: "system", text: "инструкция" },
                Message { role: "user", text: "отзыв" },
            ],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["modelUri"], "gpt://folder/yandexgpt-lite/latest");
        assert_eq!(json["completionOptions"]["maxTokens"], 2000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["text"], "отзыв");
    }

    #[test]
    fn response_body_decodes_first_alternative() {
        let raw = r#"{
            "result": {
                "alternatives": [
                    {"message": {"role": "assistant", "text": "ответ"}, "status": "ALTERNATIVE_STATUS_FINAL"}
                ],
                "usage": {"inputTextTokens": "10", "completionTokens": "5", "totalTokens": "15"},
                "modelVersion": "1.0"
            }
        }"#;

        let decoded: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.result.alternatives[0].message.text, "ответ");
    }
}
