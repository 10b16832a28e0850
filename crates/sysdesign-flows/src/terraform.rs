use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sysdesign_core::{Validate, ValidationError};

use crate::error::{Flow, FlowError};
use crate::evaluate::check_supplied_diagram;
use crate::{prompt, Advisor};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    pub fn display_name(self) -> &'static str {
        match self {
            CloudProvider::Aws => "Amazon Web Services",
            CloudProvider::Gcp => "Google Cloud",
            CloudProvider::Azure => "Microsoft Azure",
        }
    }
}

impl std::str::FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" | "google" => Ok(CloudProvider::Gcp),
            "azure" => Ok(CloudProvider::Azure),
            other => Err(format!("unknown cloud provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerraformRequest {
    /// Diagram interchange JSON to translate
    pub design_diagram: String,
    #[serde(default)]
    pub cloud_provider: CloudProvider,
    /// Deployment region, e.g. "us-east-1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Validate for TerraformRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.design_diagram.trim().is_empty() {
            return Err(ValidationError::EmptyField("designDiagram"));
        }
        check_supplied_diagram(&self.design_diagram)
    }
}

/// Best-effort HCL skeleton. The code is not parsed or checked beyond
/// being non-blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerraformOutput {
    /// Complete HCL for all resources
    pub terraform_code: String,
    /// Components that could not be mapped, or assumptions that need checking
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Follow-up improvements to the generated configuration
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Validate for TerraformOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.terraform_code.trim().is_empty() {
            return Err(ValidationError::EmptyField("terraformCode"));
        }
        Ok(())
    }
}

impl Advisor {
    pub async fn generate_terraform(
        &self,
        req: &TerraformRequest,
    ) -> Result<TerraformOutput, FlowError> {
        req.validate()?;
        self.run(
            Flow::Terraform,
            "terraform_output",
            prompt::terraform_system(),
            prompt::terraform_prompt(req),
        )
        .await
    }
}
