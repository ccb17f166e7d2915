//! OpenAI-compatible chat-completion provider

use crate::config::LanguageConfig;
use crate::error::{LanguageError, Result};
use crate::prompt;
use crate::LanguageModel;
use amica_core::Persona;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Talks to any OpenAI-compatible chat-completions endpoint. The api key
/// lives in the environment, never in config files.
pub struct ChatCompletionProvider {
    api_key: Arc<RwLock<Option<String>>>,
    client: Client,
    config: LanguageConfig,
    persona: Persona,
}

impl ChatCompletionProvider {
    pub fn new(config: LanguageConfig, persona: Persona) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();

        Self {
            api_key: Arc::new(RwLock::new(api_key)),
            client: Client::new(),
            config,
            persona,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.read().is_some()
    }

    pub fn set_api_key(&mut self, key: String) {
        *self.api_key.write() = Some(key);
    }

    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| LanguageError::MissingApiKey(self.config.api_key_env.clone()))
    }

    fn request_body(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        stop: &[String],
    ) -> serde_json::Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature.clamp(0.0, 2.0),
            "max_tokens": max_tokens,
        });

        if !stop.is_empty() {
            body["stop"] = json!(stop);
        }

        body
    }

    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        stop: &[String],
    ) -> Result<String> {
        let api_key = self.get_api_key()?;

        if !self.config.base_url.starts_with("https://") {
            return Err(LanguageError::InvalidResponse(
                "Base URL must use https".to_string(),
            ));
        }

        let body = self.request_body(prompt, temperature, max_tokens, stop);
        let url = format!("{}/chat/completions", self.config.base_url);

        debug!(model = %self.config.model, "Requesting completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(LanguageError::RateLimit);
        }
        if status == 401 || status == 403 {
            return Err(LanguageError::AuthenticationFailed);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text: String = text.chars().take(500).collect();
            return Err(LanguageError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                LanguageError::InvalidResponse("Missing choices[0].message.content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionProvider {
    async fn converse(&self, lines: &[String]) -> Result<String> {
        let built = prompt::conversation_prompt(&self.persona, lines, self.config.max_history);
        let raw = self
            .complete(
                &built,
                self.config.temperature,
                self.config.reply_max_tokens,
                &prompt::conversation_stops(),
            )
            .await?;

        Ok(prompt::scrub_reply(&raw, &self.persona.name))
    }

    async fn extract_name(&self, lines: &[String]) -> Result<Option<String>> {
        let built = prompt::name_extraction_prompt(lines);
        let raw = self
            .complete(&built, 0.0, self.config.extraction_max_tokens, &[])
            .await?;

        Ok(prompt::parse_extracted_name(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ChatCompletionProvider {
        let mut config = LanguageConfig::default();
        config.api_key_env = "AMICA_TEST_KEY_UNSET".to_string();
        ChatCompletionProvider::new(config, Persona::default())
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let body = provider.request_body("hello", 0.9, 150, &[" Human:".to_string()]);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["stop"][0], " Human:");
    }

    #[test]
    fn test_temperature_clamped() {
        let provider = provider();
        let body = provider.request_body("hello", 9.0, 10, &[]);
        assert_eq!(body["temperature"], 2.0);
        assert!(body.get("stop").is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let provider = provider();
        let result = provider.converse(&["Human: hi".to_string()]).await;
        match result {
            Err(LanguageError::MissingApiKey(env)) => {
                assert_eq!(env, "AMICA_TEST_KEY_UNSET");
            }
            other => panic!("Expected MissingApiKey, got {:?}", other.map(|_| ())),
        }
    }
}
