use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sysdesign_core::{ChatMessage, Validate, ValidationError};

use crate::error::{Flow, FlowError};
use crate::evaluate::check_supplied_diagram;
use crate::{prompt, Advisor};

/// One interview turn. The caller owns the history and resends it on every
/// call; nothing is kept between calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    /// Feature requirements the candidate is designing for; may be left out
    #[serde(default)]
    pub feature_requirements: String,
    /// Diagram interchange JSON; empty when nothing has been drawn yet
    #[serde(default)]
    pub design_diagram: String,
    /// Earlier turns, oldest first
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    /// The candidate's new message
    pub current_user_message: String,
}

impl Validate for InterviewRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.current_user_message.trim().is_empty() {
            return Err(ValidationError::EmptyField("currentUserMessage"));
        }
        self.chat_history.validate()?;
        check_supplied_diagram(&self.design_diagram)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewReply {
    /// The interviewer's next message
    pub ai_response_message: String,
}

impl Validate for InterviewReply {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.ai_response_message.trim().is_empty() {
            return Err(ValidationError::EmptyField("aiResponseMessage"));
        }
        Ok(())
    }
}

impl Advisor {
    pub async fn interview(&self, req: &InterviewRequest) -> Result<InterviewReply, FlowError> {
        req.validate()?;
        tracing::debug!(turns = req.chat_history.len(), "interview turn");
        self.run(
            Flow::Interview,
            "interview_reply",
            prompt::interview_system(),
            prompt::interview_prompt(req),
        )
        .await
    }
}
