use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use sysdesign_core::{Component, DesignRecord, DesignStore, Diagram};
use sysdesign_flows::{
    Advisor, DiagramRequest, EvaluationRequest, InterviewRequest, LlmClient, TerraformRequest,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct DesignIdRequest {
    /// ID of the saved design
    id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SaveDesignRequest {
    /// ID of an existing design to overwrite. Omit to create a new design.
    id: Option<String>,
    /// Display name of the design
    name: String,
    /// The diagram as a JSON string: {"nodes": [...], "edges": [...]}, the same shape generate_diagram returns.
    data: String,
}

// --- Server ---

#[derive(Clone)]
pub struct SysdesignServer {
    tool_router: ToolRouter<Self>,
    advisor: Arc<Advisor>,
    store: Arc<DesignStore>,
}

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!(
            "Serialization error: {}",
            e
        ))]),
    }
}

fn error_result(msg: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(msg.into())])
}

fn component_listing() -> String {
    let mut out = String::from("component\ticon\n");
    for c in Component::ALL {
        out.push_str(c.name());
        out.push('\t');
        out.push_str(c.icon());
        out.push('\n');
    }
    out
}

#[tool_router]
impl SysdesignServer {
    pub fn new(advisor: Advisor, store: DesignStore) -> Self {
        Self {
            tool_router: Self::tool_router(),
            advisor: Arc::new(advisor),
            store: Arc::new(store),
        }
    }

    #[tool(description = "List the component catalog: every allowed node label and its icon name")]
    fn list_components(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            component_listing(),
        )]))
    }

    #[tool(description = "Get the diagram construction rules the generator follows")]
    fn get_rules(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            sysdesign_core::rules::RULES,
        )]))
    }

    #[tool(
        description = "Generate a system design diagram from feature requirements. Returns {nodes: [{id, type: \"custom\", position: {x, y}, data: {label, iconName, properties}}], edges: [{id, source, target, label?, animated, style, markerEnd}]}. Every label comes from the component catalog and every edge connects two returned nodes."
    )]
    async fn generate_diagram(
        &self,
        Parameters(req): Parameters<DiagramRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.advisor.generate_diagram(&req).await {
            Ok(diagram) => Ok(json_result(&diagram)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(
        description = "Evaluate a design against its requirements. designDiagram is the diagram JSON string (may be empty). Returns overallAssessment, strengths, areasForImprovement, potentialBottlenecks, suggestedNextSteps and a rating with explanation for complexity, scalability, availability, faultTolerance, costEfficiency, security and maintainability."
    )]
    async fn evaluate_design(
        &self,
        Parameters(req): Parameters<EvaluationRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.advisor.evaluate_design(&req).await {
            Ok(report) => Ok(json_result(&report)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(
        description = "Generate a best-effort Terraform skeleton for a design. cloudProvider is \"aws\" (default), \"gcp\" or \"azure\". Returns {terraformCode, warnings, suggestions}. The HCL is not validated."
    )]
    async fn generate_terraform(
        &self,
        Parameters(req): Parameters<TerraformRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.advisor.generate_terraform(&req).await {
            Ok(out) => Ok(json_result(&out)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(
        description = "Send one message to the system design interviewer. Pass the full chatHistory (oldest first, roles \"user\"/\"model\") on every call; the server keeps no conversation state. Returns {aiResponseMessage}."
    )]
    async fn interview(
        &self,
        Parameters(req): Parameters<InterviewRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.advisor.interview(&req).await {
            Ok(reply) => Ok(json_result(&reply)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(description = "List saved designs (id, name, updatedAt), sorted by name")]
    fn list_designs(&self) -> Result<CallToolResult, McpError> {
        match self.store.list() {
            Ok(designs) if designs.is_empty() => Ok(CallToolResult::success(vec![Content::text(
                "No designs saved. Use save_design to create one.",
            )])),
            Ok(designs) => Ok(json_result(&designs)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(description = "Get a saved design: {id, name, nodes, edges, updatedAt}")]
    fn get_design(
        &self,
        Parameters(req): Parameters<DesignIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.load(&req.id) {
            Ok(record) => Ok(json_result(&record)),
            Err(e) => Ok(error_result(format!(
                "Failed to read design '{}': {}",
                req.id, e
            ))),
        }
    }

    #[tool(
        description = "Save a design. Creates a new design when id is omitted, otherwise overwrites the design with that id. Returns the saved record."
    )]
    fn save_design(
        &self,
        Parameters(req): Parameters<SaveDesignRequest>,
    ) -> Result<CallToolResult, McpError> {
        let diagram = match Diagram::from_json(&req.data) {
            Ok(d) => d,
            Err(e) => return Ok(error_result(format!("Invalid diagram JSON: {}", e))),
        };
        let saved = match req.id {
            Some(id) => self.store.save(DesignRecord {
                id,
                name: req.name,
                diagram,
                updated_at: Default::default(),
            }),
            None => self.store.create(&req.name, diagram),
        };
        match saved {
            Ok(record) => Ok(json_result(&record)),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }

    #[tool(description = "Delete a saved design. Deleting a missing design succeeds.")]
    fn delete_design(
        &self,
        Parameters(req): Parameters<DesignIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.delete(&req.id) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Deleted design '{}'",
                req.id
            ))])),
            Err(e) => Ok(error_result(e.to_string())),
        }
    }
}

#[tool_handler]
impl ServerHandler for SysdesignServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "{}\n\n## Diagram Rules\n{}",
            INSTRUCTIONS,
            sysdesign_core::rules::RULES
        );
        ServerInfo {
            instructions: Some(instructions.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"sysdesign is a system design practice tool. Diagrams are JSON objects {"nodes": [...], "edges": [...]} drawn on a node-graph canvas.

## Workflow
1. `generate_diagram` turns feature requirements into a first diagram.
2. Edit the diagram (move nodes, rename via `data.properties.name`, add or remove edges) and keep it as a JSON string.
3. `evaluate_design` rates the design on complexity, scalability, availability, fault tolerance, cost efficiency, security and maintainability.
4. `generate_terraform` produces a best-effort HCL skeleton for AWS, GCP or Azure.
5. `interview` runs a mock interview. Keep the chat history yourself and send all of it with every message.
6. `save_design` / `get_design` / `list_designs` / `delete_design` manage saved designs.

## Components
Node labels must be catalog component names and icon names must be the matching catalog icons. Call `list_components` for the table.

Every generation call is a single attempt: if the model produces nothing usable the tool returns an error such as "AI failed to generate a system design diagram". Retry by calling the tool again."#;

/// `sysdesign-mcp configure <provider> <model> [api-key]`
fn configure(args: &[String]) -> anyhow::Result<()> {
    let (provider, model) = match (args.first(), args.get(1)) {
        (Some(p), Some(m)) => (p.clone(), m.clone()),
        _ => anyhow::bail!("usage: sysdesign-mcp configure <provider> <model> [api-key]"),
    };
    let mut settings = sysdesign_core::read_settings();
    settings.provider = provider;
    settings.model = model;
    // Omitted key means "keep existing"
    if let Some(key) = args.get(2) {
        settings.api_key = key.clone();
    }
    sysdesign_core::write_settings(&settings)?;
    eprintln!(
        "Saved settings to {}",
        sysdesign_core::data_dir().join("settings.json").display()
    );
    if !sysdesign_core::ai_configured(&settings) {
        eprintln!("Warning: provider '{}' needs an API key.", settings.provider);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("configure") {
        return configure(&args[1..]);
    }

    // Logs go to stderr; stdout carries the MCP protocol.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = sysdesign_core::read_settings();
    if !sysdesign_core::ai_configured(&settings) {
        tracing::warn!(
            "AI provider is not configured; generation tools will fail until `sysdesign-mcp configure` is run or SYSDESIGN_* variables are set"
        );
    }
    let model = settings.model.clone();
    let advisor = Advisor::new(Arc::new(LlmClient::new(settings)), model);
    let store = DesignStore::open_default();
    tracing::info!(designs = %store.root().display(), "starting sysdesign MCP server");

    let service = SysdesignServer::new(advisor, store)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}
