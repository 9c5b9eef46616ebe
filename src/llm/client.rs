// Chat-completion client

use async_trait::async_trait;
use log::{error, info};
use reqwest::{self, header};

#[cfg(test)]
use mockall::automock;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::llm::schemas::openai_response::{ChatMessage, ChatRequest, OpenAIResponse};

/// Text-in, text-out completion boundary.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// OpenAI-compatible `/chat/completions` client (Groq by default).
#[derive(Clone, Debug)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl ChatCompletionClient {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ChatCompletionClient {
            client: builder.build()?,
            url: format!(
                "{}/chat/completions",
                config.completion_api_base.trim_end_matches('/')
            ),
            api_key: config.completion_api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Completer for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AnalysisError::Completion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Completion API error: status {}, body: {}", status, error_text);
            return Err(AnalysisError::Completion(format!(
                "API returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Completion(e.to_string()))?;
        if let Some(usage) = &completion.usage {
            info!("Completion used {} tokens", usage.total_tokens);
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AnalysisError::Completion("response contained no text".to_string()))
    }
}
