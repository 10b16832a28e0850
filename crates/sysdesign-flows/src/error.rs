//! Error types for flow orchestration.

use sysdesign_core::ValidationError;

/// The four request/response operations exposed by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    DiagramGeneration,
    Evaluation,
    Terraform,
    Interview,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::DiagramGeneration => "diagram-generation",
            Flow::Evaluation => "evaluation",
            Flow::Terraform => "terraform-generation",
            Flow::Interview => "interview-bot",
        }
    }

    /// What the user was waiting for, as used in failure messages.
    pub fn artifact(self) -> &'static str {
        match self {
            Flow::DiagramGeneration => "a system design diagram",
            Flow::Evaluation => "a design evaluation",
            Flow::Terraform => "Terraform code",
            Flow::Interview => "an interview response",
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport or provider failure inside the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("AI provider is not configured")]
    NotConfigured,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("build LLM: {0}")]
    Build(String),

    #[error("chat: {0}")]
    Request(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// Terminal failure of a single flow call. Flows never retry and never
/// return partial results.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("AI failed to generate {}", .flow.artifact())]
    Generation { flow: Flow, reason: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FlowError {
    pub(crate) fn generation(flow: Flow, reason: impl Into<String>) -> Self {
        FlowError::Generation {
            flow,
            reason: reason.into(),
        }
    }

    pub fn is_generation_failure(&self) -> bool {
        matches!(self, FlowError::Generation { .. })
    }
}
