//! LLM inference client (OpenAI-compatible chat completions) with
//! English to Malayalam translation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const SYSTEM_PROMPT: &str = "You are Krishi Sakhi, a helpful farming assistant for farmers in Kerala, India. Give short, practical, safe advice.";

const TEMPERATURE: f64 = 0.3;
const TOP_P: f64 = 0.9;
const MAX_TOKENS: u32 = 300;

/// Farmer context sent along with a query
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryPrompt {
    pub query: String,
    pub crop: String,
    pub location: String,
    pub soil: String,
    pub farm_size_acres: Decimal,
}

impl AdvisoryPrompt {
    pub fn user_message(&self) -> String {
        format!(
            "Query: {}. Farmer profile: Crop {}, Location {}, Soil {}, Farm size {} acres. Advise based on Indian agriculture context.",
            self.query, self.crop, self.location, self.soil, self.farm_size_acres
        )
    }
}

#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// English advice for the prompt
    async fn complete(&self, prompt: &AdvisoryPrompt) -> AppResult<String>;

    async fn translate_to_malayalam(&self, text: &str) -> AppResult<String>;
}

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct TranslationRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize, Debug)]
struct TranslationOutput {
    translation_text: String,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    translation_endpoint: String,
    api_token: Option<String>,
    model: String,
}

impl InferenceClient {
    pub fn new(
        endpoint: String,
        translation_endpoint: String,
        api_token: Option<String>,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            translation_endpoint,
            api_token,
            model,
        })
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.post(url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl InferenceProvider for InferenceClient {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user_message(),
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let response = self
            .post(&format!("{}/v1/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::InferenceError(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InferenceError(format!("{} - {}", status, body)));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::InferenceError(format!("invalid response: {}", e)))?;

        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::InferenceError("empty completion".to_string()))
    }

    async fn translate_to_malayalam(&self, text: &str) -> AppResult<String> {
        let response = self
            .post(&self.translation_endpoint)
            .json(&TranslationRequest { inputs: text })
            .send()
            .await
            .map_err(|e| AppError::InferenceError(format!("translation failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::InferenceError(format!(
                "translation error: {}",
                status
            )));
        }

        let outputs: Vec<TranslationOutput> = response
            .json()
            .await
            .map_err(|e| AppError::InferenceError(format!("invalid translation: {}", e)))?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.translation_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::InferenceError("empty translation".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_includes_profile() {
        let prompt = AdvisoryPrompt {
            query: "When to sow paddy?".to_string(),
            crop: "Paddy".to_string(),
            location: "Palakkad".to_string(),
            soil: "clay".to_string(),
            farm_size_acres: Decimal::new(15, 1),
        };
        let message = prompt.user_message();
        assert!(message.starts_with("Query: When to sow paddy?."));
        assert!(message.contains("Crop Paddy, Location Palakkad, Soil clay, Farm size 1.5 acres"));
    }
}
