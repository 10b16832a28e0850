use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use sysdesign_core::{ChatMessage, Component, Diagram, Rating};
use sysdesign_flows::prompt::{NO_DIAGRAM, NO_REQUIREMENTS};
use sysdesign_flows::{
    Advisor, DiagramRequest, EvaluationRequest, Flow, FlowError, GatewayError, GatewayRequest,
    GatewayResponse, InterviewRequest, LlmGateway, TerraformRequest,
};

/// In-memory gateway: replies with a canned output and records every request.
struct MockGateway {
    reply: Result<Option<Value>, String>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl MockGateway {
    fn returning(output: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(Some(output)),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(msg.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    async fn recorded(&self) -> Vec<GatewayRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        self.requests.lock().await.push(request);
        match &self.reply {
            Ok(output) => Ok(GatewayResponse {
                output: output.clone(),
            }),
            Err(msg) => Err(GatewayError::Request(msg.clone())),
        }
    }
}

fn advisor(gateway: Arc<MockGateway>) -> Advisor {
    Advisor::new(gateway, "test-model")
}

/// Everything about a diagram that the canvas would trip over.
fn contract_violations(diagram: &Diagram) -> Vec<String> {
    let ids: HashSet<&str> = diagram.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut out = Vec::new();
    for node in &diagram.nodes {
        if Component::from_name(&node.data.label).is_none() {
            out.push(format!("node {} label {:?} not in catalog", node.id, node.data.label));
        }
    }
    for edge in &diagram.edges {
        for end in [&edge.source, &edge.target] {
            if !ids.contains(end.as_str()) {
                out.push(format!("edge {} references missing node {}", edge.id, end));
            }
        }
    }
    out
}

fn url_shortener_output() -> Value {
    json!({
        "nodes": [
            {"id": "node-1", "type": "custom", "position": {"x": 0, "y": 100},
             "data": {"label": "Web Client", "iconName": "Monitor", "properties": {"name": "Web Client"}}},
            {"id": "node-2", "type": "custom", "position": {"x": 250, "y": 100},
             "data": {"label": "Load Balancer", "iconName": "Network", "properties": {"name": "Load Balancer"}}},
            {"id": "node-3", "type": "custom", "position": {"x": 500, "y": 100},
             "data": {"label": "Web Server", "iconName": "Server", "properties": {"name": "Shortener API", "replicas": 3}}},
            {"id": "node-4", "type": "custom", "position": {"x": 750, "y": 0},
             "data": {"label": "Cache", "iconName": "MemoryStick", "properties": {"name": "Cache", "ttl": "24h"}}},
            {"id": "node-5", "type": "custom", "position": {"x": 750, "y": 200},
             "data": {"label": "Database", "iconName": "Database", "properties": {"name": "Database"}}}
        ],
        "edges": [
            {"id": "edge-1", "source": "node-1", "target": "node-2", "label": "HTTPS"},
            {"id": "edge-2", "source": "node-2", "target": "node-3", "label": "round robin", "animated": false},
            {"id": "edge-3", "source": "node-3", "target": "node-4", "label": "lookup short code",
             "style": {"stroke": "red", "strokeWidth": 9}},
            {"id": "edge-4", "source": "node-3", "target": "node-5", "label": "persist mapping"}
        ]
    })
}

fn criterion(rating: &str) -> Value {
    json!({"rating": rating, "explanation": "Single database is the only write path."})
}

fn evaluation_output() -> Value {
    json!({
        "overallAssessment": "A reasonable starting point.",
        "strengths": ["Cache in front of the database"],
        "areasForImprovement": ["No replication"],
        "criteria": {
            "complexity": criterion("Good"),
            "scalability": criterion("Fair"),
            "availability": criterion("Needs Improvement"),
            "faultTolerance": criterion("Poor"),
            "costEfficiency": criterion("Good"),
            "security": criterion("Not Applicable"),
            "maintainability": {"rating": "Excellent", "explanation": "Few moving parts.",
                                "specificRecommendations": ["Keep it that way"]}
        }
    })
}

#[tokio::test]
async fn url_shortener_diagram_meets_contract() {
    let gateway = MockGateway::returning(url_shortener_output());
    let req = DiagramRequest {
        requirements: "Design a URL shortener with caching".into(),
    };

    let diagram = advisor(gateway.clone()).generate_diagram(&req).await.unwrap();

    assert_eq!(diagram.nodes.len(), 5);
    assert!(contract_violations(&diagram).is_empty());
    for edge in &diagram.edges {
        assert!(edge.has_visual_style(), "edge {} lacks style", edge.id);
    }
    // Model-supplied style is replaced, model-supplied animation is kept.
    assert_eq!(diagram.edges[2].style.as_ref().unwrap().stroke_width, 2.0);
    assert_eq!(diagram.edges[1].animated, Some(false));
    assert_eq!(diagram.edges[0].animated, Some(true));

    let requests = gateway.recorded().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "test-model");
    assert_eq!(requests[0].schema_name, "system_design_diagram");
    assert_eq!(requests[0].prompt_text.matches(&req.requirements).count(), 1);
    assert!(requests[0]
        .system_instructions
        .as_deref()
        .unwrap()
        .contains("Load Balancer (icon: Network)"));
}

#[test]
fn contract_check_flags_violations() {
    let mut output = url_shortener_output();
    output["nodes"][0]["data"]["label"] = json!("Mainframe");
    output["edges"][0]["target"] = json!("node-99");
    let diagram: Diagram = serde_json::from_value(output).unwrap();
    assert_eq!(contract_violations(&diagram).len(), 2);
}

#[tokio::test]
async fn dangling_edge_in_output_fails_generation() {
    let mut output = url_shortener_output();
    output["edges"][3]["target"] = json!("node-42");
    let gateway = MockGateway::returning(output);
    let req = DiagramRequest {
        requirements: "Design a URL shortener with caching".into(),
    };

    let err = advisor(gateway).generate_diagram(&req).await.unwrap_err();
    assert!(err.is_generation_failure());
    assert_eq!(err.to_string(), "AI failed to generate a system design diagram");
}

#[tokio::test]
async fn unknown_component_in_output_fails_generation() {
    let mut output = url_shortener_output();
    output["nodes"][4]["data"]["label"] = json!("Blockchain");
    let gateway = MockGateway::returning(output);
    let req = DiagramRequest {
        requirements: "Design a URL shortener".into(),
    };
    let err = advisor(gateway).generate_diagram(&req).await.unwrap_err();
    match err {
        FlowError::Generation { flow, reason } => {
            assert_eq!(flow, Flow::DiagramGeneration);
            assert!(reason.contains("Blockchain"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_output_fails_every_flow() {
    let a = advisor(MockGateway::empty());

    let err = a
        .generate_diagram(&DiagramRequest {
            requirements: "Chat".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Generation { flow: Flow::DiagramGeneration, .. }));

    let err = a
        .evaluate_design(&EvaluationRequest {
            requirements: "Chat".into(),
            design_diagram: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "AI failed to generate a design evaluation");

    let err = a
        .generate_terraform(&TerraformRequest {
            design_diagram: r#"{"nodes":[],"edges":[]}"#.into(),
            cloud_provider: Default::default(),
            region: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "AI failed to generate Terraform code");

    let err = a
        .interview(&InterviewRequest {
            feature_requirements: "Chat".into(),
            design_diagram: String::new(),
            chat_history: vec![],
            current_user_message: "Hello".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "AI failed to generate an interview response");
}

#[tokio::test]
async fn evaluation_with_empty_diagram_uses_fallback_text() {
    let gateway = MockGateway::returning(evaluation_output());
    let req = EvaluationRequest {
        requirements: "Global leaderboard for a mobile game".into(),
        design_diagram: String::new(),
    };

    let report = advisor(gateway.clone()).evaluate_design(&req).await.unwrap();
    assert_eq!(report.criteria.availability.rating, Rating::NeedsImprovement);
    assert_eq!(
        report.criteria.maintainability.specific_recommendations,
        Some(vec!["Keep it that way".to_string()])
    );
    assert!(report.suggested_next_steps.is_empty());

    let prompt = &gateway.recorded().await[0].prompt_text;
    assert!(prompt.contains(NO_DIAGRAM));
    assert_eq!(prompt.matches(&req.requirements).count(), 1);
}

#[tokio::test]
async fn evaluation_with_bad_rating_fails() {
    let mut output = evaluation_output();
    output["criteria"]["security"]["rating"] = json!("Mediocre");
    let err = advisor(MockGateway::returning(output))
        .evaluate_design(&EvaluationRequest {
            requirements: "Chat".into(),
            design_diagram: String::new(),
        })
        .await
        .unwrap_err();
    assert!(err.is_generation_failure());
}

#[tokio::test]
async fn terraform_returns_code_and_lists_verbatim() {
    let gateway = MockGateway::returning(json!({
        "terraformCode": "resource \"aws_lb\" \"main\" {}",
        "warnings": ["Web Client has no resource"],
        "suggestions": ["Configure a remote state backend"]
    }));
    let diagram = serde_json::to_string(&url_shortener_output()).unwrap();
    let req = TerraformRequest {
        design_diagram: diagram.clone(),
        cloud_provider: "aws".parse().unwrap(),
        region: Some("us-east-1".into()),
    };

    let out = advisor(gateway.clone()).generate_terraform(&req).await.unwrap();
    assert!(out.terraform_code.contains("aws_lb"));
    assert_eq!(out.warnings, vec!["Web Client has no resource"]);
    assert_eq!(out.suggestions.len(), 1);

    let prompt = &gateway.recorded().await[0].prompt_text;
    assert_eq!(prompt.matches(&diagram).count(), 1);
    assert!(prompt.contains("Region: us-east-1"));
}

#[tokio::test]
async fn interview_reply_leaves_history_untouched() {
    let gateway = MockGateway::returning(json!({
        "aiResponseMessage": "Where does a redirect lookup go when the cache misses?"
    }));
    let req = InterviewRequest {
        feature_requirements: "URL shortener".into(),
        design_diagram: String::new(),
        chat_history: vec![ChatMessage::user("Hi")],
        current_user_message: "What's the bottleneck here?".into(),
    };
    let before = req.chat_history.clone();

    let reply = advisor(gateway.clone()).interview(&req).await.unwrap();

    assert!(!reply.ai_response_message.trim().is_empty());
    assert_eq!(req.chat_history, before);
    let prompt = &gateway.recorded().await[0].prompt_text;
    assert!(prompt.contains("Candidate: Hi"));
    assert_eq!(prompt.matches("What's the bottleneck here?").count(), 1);
}

#[tokio::test]
async fn interview_accepts_history_and_message_alone() {
    let gateway = MockGateway::returning(json!({
        "aiResponseMessage": "Which component do you expect to saturate first?"
    }));
    let req: InterviewRequest = serde_json::from_str(
        r#"{"chatHistory":[{"role":"user","content":"Hi"}],"currentUserMessage":"What's the bottleneck here?"}"#,
    )
    .unwrap();

    let reply = advisor(gateway.clone()).interview(&req).await.unwrap();

    assert!(!reply.ai_response_message.trim().is_empty());
    let prompt = &gateway.recorded().await[0].prompt_text;
    assert!(prompt.contains(NO_REQUIREMENTS));
    assert!(prompt.contains(NO_DIAGRAM));
    assert_eq!(prompt.matches("What's the bottleneck here?").count(), 1);
}

#[tokio::test]
async fn blank_reply_fails_interview() {
    let gateway = MockGateway::returning(json!({"aiResponseMessage": "   "}));
    let err = advisor(gateway)
        .interview(&InterviewRequest {
            feature_requirements: "Chat".into(),
            design_diagram: String::new(),
            chat_history: vec![],
            current_user_message: "Go".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Generation { flow: Flow::Interview, .. }));
}

#[tokio::test]
async fn invalid_input_never_reaches_gateway() {
    let gateway = MockGateway::returning(url_shortener_output());
    let a = advisor(gateway.clone());

    let err = a
        .generate_diagram(&DiagramRequest {
            requirements: "   ".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidInput(_)));

    let err = a
        .evaluate_design(&EvaluationRequest {
            requirements: "Chat".into(),
            design_diagram: "not json".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidInput(_)));

    assert!(gateway.recorded().await.is_empty());
}

#[tokio::test]
async fn gateway_errors_propagate_unmasked() {
    let err = advisor(MockGateway::failing("rate limited"))
        .generate_diagram(&DiagramRequest {
            requirements: "Chat".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Gateway(GatewayError::Request(_))));
    assert_eq!(err.to_string(), "chat: rate limited");
}

#[tokio::test]
async fn concurrent_calls_are_isolated() {
    let gateway = MockGateway::returning(url_shortener_output());
    let a = advisor(gateway.clone());
    let first = DiagramRequest {
        requirements: "Design a pastebin".into(),
    };
    let second = DiagramRequest {
        requirements: "Design a URL shortener".into(),
    };

    let (r1, r2) = tokio::join!(a.generate_diagram(&first), a.generate_diagram(&second));
    assert_eq!(r1.unwrap(), r2.unwrap());

    let prompts: Vec<String> = gateway
        .recorded()
        .await
        .into_iter()
        .map(|r| r.prompt_text)
        .collect();
    assert_eq!(prompts.len(), 2);
    assert!(prompts.iter().any(|p| p.contains("pastebin") && !p.contains("URL shortener")));
}
