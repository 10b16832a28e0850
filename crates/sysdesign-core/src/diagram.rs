use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{self, Component};
use crate::error::ValidationError;
use crate::Validate;

/// The only node type the canvas registers.
pub const NODE_TYPE: &str = "custom";

/// Stroke colour shared by edge lines and arrow markers.
pub const EDGE_COLOR: &str = "hsl(var(--primary))";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Component name, exactly as listed in the component catalog
    pub label: String,
    /// Icon identifier paired with the component in the catalog
    pub icon_name: String,
    /// Editable component properties. Should contain "name" equal to the label.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl NodeData {
    /// Data for a fresh node of the given component, with `name` preset.
    pub fn for_component(component: Component) -> Self {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "name".to_string(),
            serde_json::Value::String(component.name().to_string()),
        );
        Self {
            label: component.name().to_string(),
            icon_name: component.icon().to_string(),
            properties,
        }
    }

    pub fn component(&self) -> Option<Component> {
        Component::from_name(&self.label)
    }

    /// The user-facing name: `properties.name` if set, else the label.
    pub fn display_name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.label)
    }
}

/// A node on the canvas. Matches the node-graph library's node structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    /// Unique node id within the diagram, e.g. "node-1"
    pub id: String,
    /// Always "custom"
    #[serde(rename = "type")]
    pub node_type: String,
    /// Canvas coordinates
    pub position: Position,
    pub data: NodeData,
}

impl DiagramNode {
    pub fn new(id: impl Into<String>, component: Component, position: Position) -> Self {
        Self {
            id: id.into(),
            node_type: NODE_TYPE.to_string(),
            position,
            data: NodeData::for_component(component),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl EdgeStyle {
    pub fn standard() -> Self {
        Self {
            stroke: EDGE_COLOR.to_string(),
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub marker_type: String,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

impl EdgeMarker {
    pub fn standard() -> Self {
        Self {
            marker_type: "arrowclosed".to_string(),
            width: 20.0,
            height: 20.0,
            color: EDGE_COLOR.to_string(),
        }
    }
}

/// A connection between two nodes. Matches the node-graph library's edge structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    /// Unique edge id within the diagram, e.g. "edge-1"
    pub id: String,
    /// Id of the node the connection starts from
    pub source: String,
    /// Id of the node the connection points to
    pub target: String,
    /// Short description of the relationship, e.g. "reads from"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the edge is drawn animated (defaults to true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
}

impl DiagramEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            animated: None,
            style: None,
            marker_end: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_animated(&self) -> bool {
        self.animated.unwrap_or(true)
    }

    /// Overwrite style and marker with the fixed canvas look. Whatever the
    /// model produced for these fields is discarded.
    pub fn apply_standard_style(&mut self) {
        self.animated = Some(self.is_animated());
        self.style = Some(EdgeStyle::standard());
        self.marker_end = Some(EdgeMarker::standard());
    }

    pub fn has_visual_style(&self) -> bool {
        let style_ok = self
            .style
            .as_ref()
            .is_some_and(|s| !s.stroke.is_empty() && s.stroke_width > 0.0);
        let marker_ok = self
            .marker_end
            .as_ref()
            .is_some_and(|m| !m.marker_type.is_empty());
        style_ok && marker_ok
    }
}

/// The JSON interchange shape `{nodes, edges}` passed between flows.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
pub struct Diagram {
    /// Architecture components
    #[serde(default)]
    pub nodes: Vec<DiagramNode>,
    /// Connections between components
    #[serde(default)]
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn from_json(raw: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(raw).map_err(|e| ValidationError::MalformedDiagram(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges whose source or target names no node in this diagram.
    pub fn dangling_edges(&self) -> Vec<&DiagramEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }

    pub fn apply_standard_edge_style(&mut self) {
        for edge in &mut self.edges {
            edge.apply_standard_style();
        }
    }

    /// Shape checks that hold for any diagram, including hand-edited ones:
    /// ids, node type, positions, catalog membership.
    pub fn validate_structure(&self) -> Result<(), ValidationError> {
        let mut node_ids: HashSet<&str> = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id.trim().is_empty() {
                return Err(ValidationError::EmptyNodeId(i));
            }
            if !node_ids.insert(node.id.as_str()) {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
            if node.node_type != NODE_TYPE {
                return Err(ValidationError::InvalidNodeType {
                    id: node.id.clone(),
                    found: node.node_type.clone(),
                });
            }
            if !node.position.is_finite() {
                return Err(ValidationError::NonFinitePosition(node.id.clone()));
            }
            if node.data.component().is_none() {
                return Err(ValidationError::UnknownComponent {
                    id: node.id.clone(),
                    label: node.data.label.clone(),
                });
            }
            if !catalog::is_known_icon(&node.data.icon_name) {
                return Err(ValidationError::UnknownIcon {
                    id: node.id.clone(),
                    icon: node.data.icon_name.clone(),
                });
            }
        }

        let mut edge_ids: HashSet<&str> = HashSet::new();
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.id.trim().is_empty() {
                return Err(ValidationError::EmptyEdgeId(i));
            }
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(ValidationError::DuplicateEdgeId(edge.id.clone()));
            }
        }
        Ok(())
    }

    pub fn check_references(&self) -> Result<(), ValidationError> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(ValidationError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Validate for Diagram {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_structure()?;
        self.check_references()
    }
}
