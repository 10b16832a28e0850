use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sysdesign_core::{Diagram, EvaluationCriteria, Validate, ValidationError};

use crate::error::{Flow, FlowError};
use crate::{prompt, Advisor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    /// Feature requirements the design is meant to satisfy
    pub requirements: String,
    /// Diagram interchange JSON; empty when nothing has been drawn yet
    #[serde(default)]
    pub design_diagram: String,
}

impl Validate for EvaluationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.requirements.trim().is_empty() {
            return Err(ValidationError::EmptyField("requirements"));
        }
        check_supplied_diagram(&self.design_diagram)
    }
}

/// A user-supplied diagram must parse; structural problems are logged but
/// not rejected, since the canvas is the user's to edit.
pub(crate) fn check_supplied_diagram(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Ok(());
    }
    let diagram = Diagram::from_json(raw)?;
    if let Err(e) = diagram.validate() {
        tracing::warn!(issue = %e, "supplied diagram has structural issues");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    /// One-paragraph verdict on the design as a whole
    pub overall_assessment: String,
    /// What the design does well
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Where the design falls short of the requirements
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    pub criteria: EvaluationCriteria,
    /// Components or links likely to saturate first under load
    #[serde(default)]
    pub potential_bottlenecks: Vec<String>,
    /// Ordered list of what to work on next
    #[serde(default)]
    pub suggested_next_steps: Vec<String>,
}

impl Validate for EvaluationReport {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.overall_assessment.trim().is_empty() {
            return Err(ValidationError::EmptyField("overallAssessment"));
        }
        self.criteria.validate()
    }
}

impl Advisor {
    /// Evaluate a design. The report is returned exactly as the model wrote it.
    pub async fn evaluate_design(
        &self,
        req: &EvaluationRequest,
    ) -> Result<EvaluationReport, FlowError> {
        req.validate()?;
        self.run(
            Flow::Evaluation,
            "design_evaluation",
            prompt::evaluation_system(),
            prompt::evaluation_prompt(req),
        )
        .await
    }
}
