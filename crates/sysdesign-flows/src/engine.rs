use std::time::Duration;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, StructuredOutputFormat};

use sysdesign_core::{ai_configured, AiSettings};

use crate::error::GatewayError;
use crate::parse;

/// One structured-output request to the model.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub model: String,
    pub system_instructions: Option<String>,
    pub prompt_text: String,
    /// Name of the output schema, `[a-z_]+`.
    pub schema_name: &'static str,
    pub output_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct GatewayResponse {
    /// The model's structured object, or `None` when it produced nothing usable.
    pub output: Option<serde_json::Value>,
}

/// Schema-in/schema-out boundary to a hosted model.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

/// JSON schema for a flow output type.
pub fn output_schema<T: schemars::JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(serde_json::Value::Null)
}

fn map_backend(provider: &str) -> Result<LLMBackend, GatewayError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(GatewayError::UnknownProvider(other.to_string())),
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`LlmGateway`] backed by the `llm` crate. Constructed once at startup and
/// handed to the flows; an unconfigured client fails on first use.
#[derive(Debug, Clone)]
pub struct LlmClient {
    settings: AiSettings,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(settings: AiSettings) -> Self {
        Self {
            settings,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmGateway for LlmClient {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if !ai_configured(&self.settings) {
            return Err(GatewayError::NotConfigured);
        }
        let backend = map_backend(&self.settings.provider)?;

        let format: StructuredOutputFormat = serde_json::from_value(serde_json::json!({
            "name": request.schema_name,
            "schema": request.output_schema,
        }))
        .map_err(|e| GatewayError::Build(format!("output schema: {e}")))?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&request.model)
            .schema(format);

        if let Some(system) = &request.system_instructions {
            builder = builder.system(system);
        }
        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder.build().map_err(|e| GatewayError::Build(e.to_string()))?;

        let messages = vec![ChatMessage::user().content(&request.prompt_text).build()];

        tracing::debug!(
            provider = %self.settings.provider,
            model = %request.model,
            schema = request.schema_name,
            "sending prompt"
        );

        let response = tokio::time::timeout(self.timeout, llm.chat(&messages))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let output = match response.text() {
            Some(text) if !text.trim().is_empty() => {
                tracing::trace!(raw = %text, "raw model output");
                parse::extract_object(&text)
            }
            _ => None,
        };
        if output.is_none() {
            tracing::warn!(schema = request.schema_name, "model returned no structured output");
        }
        Ok(GatewayResponse { output })
    }
}
