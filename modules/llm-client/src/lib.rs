pub mod util;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint, tuned for
/// extraction work: low temperature, single-shot, raw string out. Parsing the
/// response is the caller's concern; the model is not trusted to return
/// valid JSON.
pub struct LlmClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Run one extraction call: system instruction + user content in, the
    /// model's raw text out. Code fences are stripped; nothing else is.
    pub async fn extract(&self, instruction: &str, content: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: content.to_string(),
                },
            ],
            temperature: 0.1,
            max_tokens: 4000,
        };

        debug!(model = %self.model, "LLM extraction request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("LLM API error ({}): {}", status, error_text));
        }

        let chat_response: ChatResponse = response.json().await?;

        let raw = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from LLM"))?;

        Ok(util::strip_code_blocks(&raw).to_string())
    }
}
