use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
            Rating::NeedsImprovement => "Needs Improvement",
            Rating::NotApplicable => "Not Applicable",
        }
    }
}

/// Assessment of a design against a single criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriterion {
    pub rating: Rating,
    /// Why the design earned this rating, referring to concrete components
    pub explanation: String,
    /// Concrete changes that would improve the rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_recommendations: Option<Vec<String>>,
}

impl Validate for EvaluationCriterion {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.explanation.trim().is_empty() {
            return Err(ValidationError::EmptyField("explanation"));
        }
        Ok(())
    }
}

/// The fixed set of criteria every evaluation covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriteria {
    pub complexity: EvaluationCriterion,
    pub scalability: EvaluationCriterion,
    pub availability: EvaluationCriterion,
    pub fault_tolerance: EvaluationCriterion,
    pub cost_efficiency: EvaluationCriterion,
    pub security: EvaluationCriterion,
    pub maintainability: EvaluationCriterion,
}

impl EvaluationCriteria {
    pub const NAMES: [&'static str; 7] = [
        "complexity",
        "scalability",
        "availability",
        "faultTolerance",
        "costEfficiency",
        "security",
        "maintainability",
    ];

    /// Criteria paired with their wire names, in [`Self::NAMES`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &EvaluationCriterion)> {
        Self::NAMES.into_iter().zip([
            &self.complexity,
            &self.scalability,
            &self.availability,
            &self.fault_tolerance,
            &self.cost_efficiency,
            &self.security,
            &self.maintainability,
        ])
    }
}

impl Validate for EvaluationCriteria {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(|(_, c)| c.validate())
    }
}
