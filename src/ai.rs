//! Azure OpenAI chat-completions client.
//!
//! One non-streaming completion per inbound message, with a fixed system
//! instruction and fixed sampling parameters. Callers substitute
//! [`FALLBACK_REPLY`] when the call fails.

use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str =
    "You are a helpful WhatsApp assistant. Provide concise, friendly, and helpful responses.";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 1.0;

/// User-facing text sent when reply generation fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error processing your message. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion api error: {0}")]
    Api(String),
}

#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl CompletionClient {
    pub fn new(endpoint: &str, api_key: &str, deployment: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            deployment: deployment.to_string(),
            api_version: api_version.to_string(),
        }
    }

    /// Generate a reply for the user's text.
    pub async fn complete(&self, user_text: &str) -> Result<String, CompletionError> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        );
        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_text.to_string(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!("{} {}", status, text)));
        }

        let data: ChatResponse = response.json().await?;
        data.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Api("response carried no choices".to_string()))
    }
}
