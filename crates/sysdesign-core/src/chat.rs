use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of an interview conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ChatMessage {
    /// "user" for the candidate, "model" for the interviewer
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// Borrowed view of a message with role flags for template rendering.
/// Never written back into the caller's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedMessage<'a> {
    pub content: &'a str,
    pub is_user: bool,
    pub is_model: bool,
}

pub fn annotate(history: &[ChatMessage]) -> Vec<AnnotatedMessage<'_>> {
    history
        .iter()
        .map(|m| AnnotatedMessage {
            content: &m.content,
            is_user: m.role == ChatRole::User,
            is_model: m.role == ChatRole::Model,
        })
        .collect()
}

impl Validate for [ChatMessage] {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.iter().position(|m| m.content.trim().is_empty()) {
            Some(i) => Err(ValidationError::EmptyChatMessage(i)),
            None => Ok(()),
        }
    }
}
