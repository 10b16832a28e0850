use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sysdesign_core::{Diagram, Validate, ValidationError};

use crate::error::{Flow, FlowError};
use crate::{prompt, Advisor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRequest {
    /// Free-text feature requirements to design for
    pub requirements: String,
}

impl Validate for DiagramRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.requirements.trim().is_empty() {
            return Err(ValidationError::EmptyField("requirements"));
        }
        Ok(())
    }
}

impl Advisor {
    /// Generate a diagram for the requirements. Every returned node is a
    /// catalog component, every edge connects two returned nodes and carries
    /// the standard canvas style.
    pub async fn generate_diagram(&self, req: &DiagramRequest) -> Result<Diagram, FlowError> {
        req.validate()?;
        let mut diagram: Diagram = self
            .run(
                Flow::DiagramGeneration,
                "system_design_diagram",
                prompt::diagram_system(),
                prompt::diagram_prompt(req),
            )
            .await?;
        diagram.apply_standard_edge_style();
        tracing::info!(
            nodes = diagram.nodes.len(),
            edges = diagram.edges.len(),
            "generated diagram"
        );
        Ok(diagram)
    }
}
