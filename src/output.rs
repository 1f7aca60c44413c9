//! Output types for the renderer.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! draws each node at `position` and connects them along `edges`.

use serde::Serialize;

use crate::error::LayoutError;
use crate::layout::{LayoutEdge, LayoutResult, NodeData, PlacedNode, Point, Rect};

/// A placed node ready for the frontend to display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
    /// Top-left corner
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Placed over something else because the retry budget ran out
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overlapping: bool,
}

impl From<&PlacedNode> for NodeOutput {
    fn from(node: &PlacedNode) -> Self {
        Self {
            id: node.id.clone(),
            data: node.data.clone(),
            position: node.position,
            width: node.bounds.w,
            height: node.bounds.h,
            overlapping: node.overlapping,
        }
    }
}

/// Error information for the frontend
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    /// "input", "config" or "serialize"
    pub kind: &'static str,
}

impl From<&LayoutError> for ErrorInfo {
    fn from(err: &LayoutError) -> Self {
        let kind = match err {
            LayoutError::InvalidInput(_) => "input",
            LayoutError::InvalidConfig { .. } => "config",
            LayoutError::Serialize(_) => "serialize",
        };
        Self { message: err.to_string(), kind }
    }
}

/// The combined output sent to the frontend
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<LayoutEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl From<&LayoutResult> for LayoutOutput {
    fn from(result: &LayoutResult) -> Self {
        Self {
            nodes: result.nodes.iter().map(NodeOutput::from).collect(),
            edges: result.edges.clone(),
            bounds: Some(result.bounds),
            error: None,
        }
    }
}

impl LayoutOutput {
    pub fn from_error(err: &LayoutError) -> Self {
        Self {
            nodes: vec![],
            edges: vec![],
            bounds: None,
            error: Some(ErrorInfo::from(err)),
        }
    }
}
