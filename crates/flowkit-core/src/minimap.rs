//! Minimap overview of the graph and its per-node rectangles.

use crate::error::ContractError;
use crate::ElementId;
use crate::node::{GraphNode, Node};
use crate::validate::{Validate, non_negative};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_NODE_COLOR: &str = "#fff";
pub const DEFAULT_NODE_STROKE_COLOR: &str = "#555";
pub const DEFAULT_MASK_COLOR: &str = "rgb(240, 242, 243, 0.7)";
pub const DEFAULT_NODE_BORDER_RADIUS: f32 = 5.0;
pub const DEFAULT_NODE_STROKE_WIDTH: f32 = 2.0;

/// Node handed to a style resolver: either as declared in the flow elements
/// or after the renderer has measured it.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Node(&'a Node),
    Graph(&'a GraphNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a ElementId {
        match self {
            NodeRef::Node(node) => &node.id,
            NodeRef::Graph(node) => &node.id,
        }
    }

    pub fn node_type(&self) -> Option<&'a str> {
        match self {
            NodeRef::Node(node) => node.node_type.as_deref(),
            NodeRef::Graph(node) => node.node_type.as_deref(),
        }
    }

    pub fn data(&self) -> Option<&'a serde_json::Value> {
        match self {
            NodeRef::Node(node) => node.data.as_ref(),
            NodeRef::Graph(node) => node.data.as_ref(),
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        NodeRef::Node(node)
    }
}

impl<'a> From<&'a GraphNode> for NodeRef<'a> {
    fn from(node: &'a GraphNode) -> Self {
        NodeRef::Graph(node)
    }
}

/// Resolves a style string for one node.
pub type StringFunc = Arc<dyn Fn(NodeRef<'_>) -> String + Send + Sync>;

/// A style value given either literally or computed per node.
///
/// Only literals have a wire form; a resolver can be installed from code but
/// fails to serialize.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub enum NodeStyleValue {
    Literal(String),
    Resolver(StringFunc),
}

impl NodeStyleValue {
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(NodeRef<'_>) -> String + Send + Sync + 'static,
    {
        NodeStyleValue::Resolver(Arc::new(f))
    }

    pub fn resolve<'a>(&self, node: impl Into<NodeRef<'a>>) -> String {
        match self {
            NodeStyleValue::Literal(value) => value.clone(),
            NodeStyleValue::Resolver(f) => f(node.into()),
        }
    }
}

impl Serialize for NodeStyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeStyleValue::Literal(value) => serializer.serialize_str(value),
            NodeStyleValue::Resolver(_) => Err(S::Error::custom(ContractError::UnserializableResolver)),
        }
    }
}

impl From<String> for NodeStyleValue {
    fn from(value: String) -> Self {
        NodeStyleValue::Literal(value)
    }
}

impl From<&str> for NodeStyleValue {
    fn from(value: &str) -> Self {
        NodeStyleValue::Literal(value.to_string())
    }
}

impl fmt::Debug for NodeStyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStyleValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            NodeStyleValue::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MiniMapProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_color: Option<NodeStyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_stroke_color: Option<NodeStyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_class_name: Option<NodeStyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_stroke_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_color: Option<String>,
}

impl MiniMapProps {
    /// Props for the minimap rectangle of `node`, with defaults filled in.
    pub fn node_props(&self, node: &GraphNode) -> MiniMapNodeProps {
        let resolve = |value: &Option<NodeStyleValue>, default: &str| {
            value
                .as_ref()
                .map_or_else(|| default.to_string(), |v| v.resolve(node))
        };
        MiniMapNodeProps {
            x: Some(node.computed_position.x),
            y: Some(node.computed_position.y),
            width: Some(node.dimensions.width),
            height: Some(node.dimensions.height),
            border_radius: Some(
                self.node_border_radius
                    .unwrap_or(DEFAULT_NODE_BORDER_RADIUS),
            ),
            color: Some(resolve(&self.node_color, DEFAULT_NODE_COLOR)),
            shape_rendering: None,
            stroke_color: Some(resolve(&self.node_stroke_color, DEFAULT_NODE_STROKE_COLOR)),
            stroke_width: Some(self.node_stroke_width.unwrap_or(DEFAULT_NODE_STROKE_WIDTH)),
        }
    }

    pub fn node_class(&self, node: &GraphNode) -> String {
        self.node_class_name
            .as_ref()
            .map(|v| v.resolve(node))
            .unwrap_or_default()
    }

    pub fn mask_color(&self) -> &str {
        self.mask_color.as_deref().unwrap_or(DEFAULT_MASK_COLOR)
    }
}

impl Validate for MiniMapProps {
    fn validate(&self) -> Result<(), ContractError> {
        non_negative("nodeBorderRadius", self.node_border_radius)?;
        non_negative("nodeStrokeWidth", self.node_stroke_width)?;
        Ok(())
    }
}

/// SVG `shape-rendering` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeRendering {
    Inherit,
    Auto,
    GeometricPrecision,
    OptimizeSpeed,
    CrispEdges,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MiniMapNodeProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_rendering: Option<ShapeRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
}

impl Validate for MiniMapNodeProps {
    fn validate(&self) -> Result<(), ContractError> {
        non_negative("width", self.width)?;
        non_negative("height", self.height)?;
        non_negative("borderRadius", self.border_radius)?;
        non_negative("strokeWidth", self.stroke_width)?;
        Ok(())
    }
}
