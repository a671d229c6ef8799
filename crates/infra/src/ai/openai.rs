use serde::{Deserialize, Serialize};
use tracing::debug;

use listingforge_ai::{ModelClient, ModelError};

use crate::config::{ApiKey, ModelConfig};

/// Blocking client for the OpenAI chat completions endpoint.
///
/// Built once from a [`ModelConfig`]; the underlying HTTP client keeps its
/// own connection pool and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: ApiKey,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: config.chat_completions_url(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelClient for OpenAiClient {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        let body = ChatRequest::new(&self.model, system_prompt, user_prompt, temperature, max_tokens);
        debug!(url = %self.url, model = %self.model, "sending chat completion request");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .map_err(|e| ModelError::transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ModelError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ModelError::api(status.as_u16(), api_error_message(&text)));
        }

        extract_content(&text)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system: &'a str, user: &'a str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the first choice's text out of a successful response body.
fn extract_content(body: &str) -> Result<String, ModelError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::invalid_reply(format!("response body is not a chat completion: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::invalid_reply("response has no choices"))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(ModelError::EmptyReply);
    }
    Ok(content)
}

/// Best-effort message from an error body; falls back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let body = ChatRequest::new("gpt-3.5-turbo", "sys", "user prompt", 0.7, 500);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], json!("gpt-3.5-turbo"));
        assert_eq!(
            json["messages"],
            json!([
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "user prompt" },
            ])
        );
        assert_eq!(json["max_tokens"], json!(500));
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = json!({
            "id": "chatcmpl-123",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "{\"title\": \"x\"}" } },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
            ]
        })
        .to_string();
        assert_eq!(extract_content(&body).unwrap(), "{\"title\": \"x\"}");
    }

    #[test]
    fn empty_or_null_content_is_an_empty_reply() {
        for content in [json!(""), json!(null), json!("  ")] {
            let body = json!({ "choices": [{ "message": { "content": content } }] }).to_string();
            assert!(matches!(extract_content(&body), Err(ModelError::EmptyReply)));
        }
    }

    #[test]
    fn missing_choices_is_an_invalid_reply() {
        let err = extract_content(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidReply(_)));

        let err = extract_content("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ModelError::InvalidReply(_)));
    }

    #[test]
    fn api_error_message_prefers_structured_body() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn client_targets_configured_endpoint() {
        let mut config = ModelConfig::new(ApiKey::new("sk-test")).with_model("gpt-4o-mini");
        config.base_url = "http://127.0.0.1:9".to_string();
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.url, "http://127.0.0.1:9/chat/completions");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let mut config = ModelConfig::new(ApiKey::new("sk-test"));
        // Port 9 (discard) is not expected to accept HTTP connections.
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout = std::time::Duration::from_secs(2);
        let client = OpenAiClient::new(&config).unwrap();

        let err = client.complete("sys", "user", 0.7, 10).unwrap_err();
        assert!(matches!(err, ModelError::Transport(_)));
    }
}
