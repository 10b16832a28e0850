pub mod engine;
pub mod error;
pub mod evaluate;
pub mod generate;
pub mod interview;
mod parse;
pub mod prompt;
pub mod terraform;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use sysdesign_core::Validate;

pub use engine::{GatewayRequest, GatewayResponse, LlmClient, LlmGateway};
pub use error::{Flow, FlowError, GatewayError};
pub use evaluate::{EvaluationReport, EvaluationRequest};
pub use generate::DiagramRequest;
pub use interview::{InterviewReply, InterviewRequest};
pub use terraform::{CloudProvider, TerraformOutput, TerraformRequest};

/// Runs the four flows against an injected gateway.
///
/// Holds no per-call state: every method is a single request/response and
/// concurrent calls share nothing but the gateway handle.
#[derive(Clone)]
pub struct Advisor {
    gateway: Arc<dyn LlmGateway>,
    model: String,
}

impl Advisor {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Shared flow shape: call the gateway, then reject anything that is
    /// missing, does not deserialize, or fails its contract check.
    async fn run<T>(
        &self,
        flow: Flow,
        schema_name: &'static str,
        system: String,
        prompt: String,
    ) -> Result<T, FlowError>
    where
        T: DeserializeOwned + schemars::JsonSchema + Validate,
    {
        let request = GatewayRequest {
            model: self.model.clone(),
            system_instructions: Some(system),
            prompt_text: prompt,
            schema_name,
            output_schema: engine::output_schema::<T>(),
        };

        tracing::debug!(%flow, model = %self.model, "invoking gateway");
        let response = self.gateway.generate(request).await.inspect_err(|e| {
            tracing::error!(%flow, error = %e, "gateway call failed");
        })?;

        let fail = |reason: String| {
            tracing::error!(%flow, %reason, "generation failed");
            FlowError::generation(flow, reason)
        };

        let value = response
            .output
            .ok_or_else(|| fail("gateway returned no output".to_string()))?;
        let output: T = serde_json::from_value(value)
            .map_err(|e| fail(format!("output does not match schema: {e}")))?;
        output
            .validate()
            .map_err(|e| fail(format!("output failed validation: {e}")))?;

        tracing::info!(%flow, "flow completed");
        Ok(output)
    }
}
