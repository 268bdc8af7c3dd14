//! Chat Completions client implementing `TextGenerator`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use threadsim_core::{GenerationError, Stance, TextGenerator};

use super::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorResponse, FunctionDefinition,
    ResponseMessage, StanceSelection,
};
use crate::prompts::{self, MAX_STANCES, MIN_STANCES, Prompt, SELECT_STANCES_FUNCTION};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Public OpenAI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Default settings for `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Generator backed by the Chat Completions API.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    /// Create a generator.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<ResponseMessage, GenerationError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(GenerationError::EmptyResponse)
    }

    async fn chat(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest::new(&self.config.model, &prompt.system, &prompt.user);
        self.send(&request)
            .await?
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn select_stances(
        &self,
        category: &str,
        prompt: &str,
        catalog: &[Stance],
    ) -> Result<Vec<Stance>, GenerationError> {
        let catalog_json = serde_json::to_string(catalog)
            .map_err(|e| GenerationError::Request(format!("Failed to encode catalog: {e}")))?;
        let prompt = prompts::stance_selection(category, prompt, &catalog_json);

        let request = ChatCompletionRequest::new(&self.config.model, &prompt.system, &prompt.user)
            .force_function(FunctionDefinition {
                name: SELECT_STANCES_FUNCTION,
                description: "Select 5 to 8 stances from a list of predefined options",
                parameters: prompts::stance_selection_schema(),
            });

        let message = self.send(&request).await?;
        let stances = parse_stance_selection(&message)?;
        tracing::debug!(count = stances.len(), "Stances selected");
        Ok(stances)
    }

    async fn generate_comment(
        &self,
        prompt: &str,
        stance: &Stance,
    ) -> Result<String, GenerationError> {
        self.chat(&prompts::comment(prompt, stance)).await
    }

    async fn generate_reply(
        &self,
        prompt: &str,
        parent_text: &str,
    ) -> Result<String, GenerationError> {
        self.chat(&prompts::reply(prompt, parent_text)).await
    }
}

/// Extract and validate the stances from a forced function call.
fn parse_stance_selection(message: &ResponseMessage) -> Result<Vec<Stance>, GenerationError> {
    let call = message
        .tool_calls
        .iter()
        .find(|call| call.function.name == SELECT_STANCES_FUNCTION)
        .ok_or_else(|| GenerationError::InvalidStances("no function call in response".into()))?;

    let selection: StanceSelection = serde_json::from_str(&call.function.arguments)
        .map_err(|e| GenerationError::InvalidStances(e.to_string()))?;

    let count = selection.stances.len();
    if !(MIN_STANCES..=MAX_STANCES).contains(&count) {
        return Err(GenerationError::InvalidStances(format!(
            "expected {MIN_STANCES} to {MAX_STANCES} stances, got {count}"
        )));
    }

    Ok(selection.stances)
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.to_string(), |wrapper| wrapper.error.message);
    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}
