//! Error types for the core data model and design storage.

/// A payload that does not conform to its contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("diagram is not valid JSON: {0}")]
    MalformedDiagram(String),

    #[error("node at index {0} has an empty id")]
    EmptyNodeId(usize),

    #[error("edge at index {0} has an empty id")]
    EmptyEdgeId(usize),

    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(String),

    #[error("node '{id}' has type '{found}', expected 'custom'")]
    InvalidNodeType { id: String, found: String },

    #[error("node '{0}' has a non-finite position")]
    NonFinitePosition(String),

    #[error("node '{id}' uses unknown component '{label}'")]
    UnknownComponent { id: String, label: String },

    #[error("node '{id}' uses unknown icon '{icon}'")]
    UnknownIcon { id: String, icon: String },

    #[error("edge '{edge}' references missing node '{node}'")]
    DanglingEdge { edge: String, node: String },

    #[error("chat message at index {0} has empty content")]
    EmptyChatMessage(usize),
}

/// Design store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("design '{0}' not found")]
    NotFound(String),

    #[error("invalid design id '{0}'")]
    InvalidId(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
