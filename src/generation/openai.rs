use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::config::{GeneratorConfig, API_KEY_ENV};
use crate::error::{Result, StudyError};
use crate::storage::StudyStorage;

/// Chat message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint
pub struct OpenAiGenerator {
    client: Client,
    config: GeneratorConfig,
    api_key: String,
}

/// API key from the key file, else from the environment
pub fn resolve_api_key(storage: &StudyStorage, env_value: Option<String>) -> Result<String> {
    if let Some(key) = storage.load_api_key()? {
        return Ok(key);
    }
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            StudyError::GeneratorUnavailable(format!(
                "no API key found; run `key set` or export {}",
                API_KEY_ENV
            ))
        })
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Build a generator using the stored (or environment) API key
    pub fn from_storage(storage: &StudyStorage, config: GeneratorConfig) -> Result<Self> {
        let api_key = resolve_api_key(storage, std::env::var(API_KEY_ENV).ok())?;
        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request<'a>(&'a self, prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        log::info!("Requesting completion from {} ({})", self.endpoint(), self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(StudyError::GeneratorUnavailable(
                    "authentication failed, check the API key".to_string(),
                ));
            }
            status if !status.is_success() => {
                return Err(StudyError::GeneratorUnavailable(format!(
                    "server error: {} - {}",
                    status.as_u16(),
                    response.text().unwrap_or_default()
                )));
            }
            _ => {}
        }

        let body: ChatResponse = response.json()?;
        first_choice(body)
    }
}

fn first_choice(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| StudyError::GeneratorUnavailable("empty completion".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_request_serialization() {
        let generator = OpenAiGenerator::new(GeneratorConfig::default(), "sk".into()).unwrap();
        let json = serde_json::to_value(generator.request("Make cards")).unwrap();

        assert_eq!(json["model"], "gpt-4.1-nano");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Make cards");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let config = GeneratorConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..Default::default()
        };
        let generator = OpenAiGenerator::new(config, "sk".into()).unwrap();
        assert_eq!(generator.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  ### Card\n- x \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(body).unwrap(), "### Card\n- x");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(empty), Err(StudyError::GeneratorUnavailable(_))));
    }

    #[test]
    fn test_resolve_api_key_prefers_file() {
        let temp = TempDir::new().unwrap();
        let storage = StudyStorage::new(temp.path().to_path_buf());

        assert!(matches!(
            resolve_api_key(&storage, None),
            Err(StudyError::GeneratorUnavailable(_))
        ));
        assert_eq!(resolve_api_key(&storage, Some("sk-env".into())).unwrap(), "sk-env");

        storage.save_api_key("sk-file").unwrap();
        assert_eq!(resolve_api_key(&storage, Some("sk-env".into())).unwrap(), "sk-file");
    }
}
