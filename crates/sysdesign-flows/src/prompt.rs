use sysdesign_core::catalog;
use sysdesign_core::chat::annotate;
use sysdesign_core::{Diagram, EvaluationCriteria};

use crate::evaluate::EvaluationRequest;
use crate::generate::DiagramRequest;
use crate::interview::InterviewRequest;
use crate::terraform::TerraformRequest;

/// Substituted for a missing or blank diagram.
pub const NO_DIAGRAM: &str = "No diagram provided yet.";

/// Substituted for a missing Terraform region.
pub const NO_REGION: &str = "not specified; declare a `region` variable with a sensible default";

/// Substituted for interview requirements the caller left out.
pub const NO_REQUIREMENTS: &str =
    "No feature requirements given; infer them from the conversation and the design.";

/// Substituted for an interview with no prior turns.
pub const NO_HISTORY: &str = "This is the first message of the interview.";

fn diagram_or_fallback(raw: &str) -> &str {
    if raw.trim().is_empty() {
        NO_DIAGRAM
    } else {
        raw
    }
}

/// Compact text view of a diagram: one line per node and per edge, using
/// display names so the model can refer to components the way the user sees them.
pub fn diagram_digest(diagram: &Diagram) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str("COMPONENTS:\n");
    for node in &diagram.nodes {
        let d = &node.data;
        out.push_str("- ");
        out.push_str(&node.id);
        out.push_str(" \"");
        out.push_str(d.display_name());
        out.push('"');
        if d.display_name() != d.label {
            out.push_str(" (");
            out.push_str(&d.label);
            out.push(')');
        }
        let extra: Vec<String> = d
            .properties
            .iter()
            .filter(|(k, _)| k.as_str() != "name")
            .map(|(k, v)| match v.as_str() {
                Some(s) => format!("{k}={s}"),
                None => format!("{k}={v}"),
            })
            .collect();
        if !extra.is_empty() {
            out.push_str(" [");
            out.push_str(&extra.join(", "));
            out.push(']');
        }
        out.push('\n');
    }

    out.push_str("CONNECTIONS:\n");
    for edge in &diagram.edges {
        let name_of = |id: &str| {
            diagram
                .node(id)
                .map(|n| format!("\"{}\"", n.data.display_name()))
                .unwrap_or_else(|| format!("<missing {id}>"))
        };
        out.push_str("- ");
        out.push_str(&name_of(&edge.source));
        out.push_str(" --[");
        out.push_str(edge.label.as_deref().unwrap_or("uses"));
        out.push_str("]--> ");
        out.push_str(&name_of(&edge.target));
        out.push('\n');
    }

    out
}

/// Digest section appended when the supplied diagram parses; empty otherwise.
fn digest_section(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match Diagram::from_json(raw) {
        Ok(diagram) if !diagram.is_empty() => {
            format!("\n\nComponent overview:\n{}", diagram_digest(&diagram))
        }
        _ => String::new(),
    }
}

// --- Diagram generation ---

pub fn diagram_system() -> String {
    format!(
        "You are a senior software architect. Turn feature requirements into a system design \
diagram for a node-graph canvas.\n\n\
Output ONLY a JSON object of the form {{\"nodes\": [...], \"edges\": [...]}}.\n\
Node: {{\"id\", \"type\": \"custom\", \"position\": {{\"x\", \"y\"}}, \
\"data\": {{\"label\", \"iconName\", \"properties\": {{\"name\"}}}}}}.\n\
Edge: {{\"id\", \"source\", \"target\", \"label\", \"animated\": true}}.\n\n\
## Rules\n{}\n\n\
## Component catalog\n{}",
        sysdesign_core::rules::RULES,
        catalog::catalog_listing()
    )
}

pub fn diagram_prompt(req: &DiagramRequest) -> String {
    format!(
        "Design a system architecture for the following feature requirements.\n\n\
Requirements:\n{}\n\n\
Return the diagram JSON only.",
        req.requirements
    )
}

// --- Evaluation ---

pub fn evaluation_system() -> String {
    format!(
        "You are a principal engineer reviewing a system design exercise. Judge the design \
against the stated requirements, not against an ideal architecture.\n\n\
Rate each criterion ({}) as one of: Excellent, Good, Fair, Poor, Needs Improvement, \
Not Applicable. Every explanation must name the components it is talking about. Give \
specificRecommendations only when a concrete change would raise the rating.\n\n\
Also give an overallAssessment paragraph, strengths, areasForImprovement, \
potentialBottlenecks and suggestedNextSteps. If no diagram was provided, say so in the \
overall assessment and rate every criterion Not Applicable.\n\n\
Output ONLY the JSON object.",
        EvaluationCriteria::NAMES.join(", ")
    )
}

pub fn evaluation_prompt(req: &EvaluationRequest) -> String {
    format!(
        "Evaluate this system design.\n\n\
Feature requirements:\n{}\n\n\
Design diagram (JSON):\n{}{}",
        req.requirements,
        diagram_or_fallback(&req.design_diagram),
        digest_section(&req.design_diagram)
    )
}

// --- Terraform ---

pub fn terraform_system() -> String {
    "You are a cloud infrastructure engineer. Translate a system design diagram into a \
Terraform (HCL) skeleton.\n\n\
- Map each component to the closest managed service of the target cloud; use component \
properties (engine, size, replicas, TTL) as resource arguments where they apply.\n\
- Include the required_providers block, variables for anything environment specific, and \
outputs for endpoints.\n\
- Never hard-code credentials or secrets; reference variables instead.\n\
- Components with no sensible resource get a comment explaining why, plus an entry in warnings.\n\
- Put follow-up advice (state backend, modules, tagging) in suggestions.\n\n\
Output ONLY a JSON object: {\"terraformCode\": \"<HCL>\", \"warnings\": [...], \"suggestions\": [...]}."
        .to_string()
}

pub fn terraform_prompt(req: &TerraformRequest) -> String {
    let region = req
        .region
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(NO_REGION);
    format!(
        "Generate Terraform for this design.\n\n\
Target cloud: {}\n\
Region: {}\n\n\
Design diagram (JSON):\n{}",
        req.cloud_provider.display_name(),
        region,
        req.design_diagram
    )
}

// --- Interview bot ---

pub fn interview_system() -> String {
    "You are an experienced system design interviewer. The candidate is working through a \
design on a canvas. Ask one probing question or give one focused piece of feedback per turn. \
Challenge vague answers, ask about trade-offs, bottlenecks and failure modes, and refer to \
components by name. Do not hand the candidate a complete solution. Keep replies under 150 words.\n\n\
Output ONLY a JSON object: {\"aiResponseMessage\": \"<your reply>\"}."
        .to_string()
}

pub fn interview_prompt(req: &InterviewRequest) -> String {
    let mut history = String::new();
    for msg in annotate(&req.chat_history) {
        if msg.is_user {
            history.push_str("Candidate: ");
        } else if msg.is_model {
            history.push_str("Interviewer: ");
        }
        history.push_str(msg.content);
        history.push('\n');
    }
    if history.is_empty() {
        history.push_str(NO_HISTORY);
        history.push('\n');
    }
    let requirements: &str = if req.feature_requirements.trim().is_empty() {
        NO_REQUIREMENTS
    } else {
        req.feature_requirements.as_str()
    };

    format!(
        "Feature requirements:\n{}\n\n\
Current design (JSON):\n{}{}\n\n\
Conversation so far:\n{}\n\
Candidate's new message:\n{}",
        requirements,
        diagram_or_fallback(&req.design_diagram),
        digest_section(&req.design_diagram),
        history,
        req.current_user_message
    )
}
