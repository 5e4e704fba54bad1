use crate::error::ContractError;
use crate::{Dimensions, ElementId, Position, XYPosition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Node {
    pub id: ElementId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub position: XYPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Edge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<ElementId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// One entry of the flow's element list: either a node or an edge.
///
/// Nodes require `position` and edges require `source`/`target`; since both
/// shapes reject unknown fields the two never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowElement {
    Node(Node),
    Edge(Edge),
}

impl FlowElement {
    pub fn id(&self) -> &ElementId {
        match self {
            FlowElement::Node(node) => &node.id,
            FlowElement::Edge(edge) => &edge.id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, FlowElement::Node(_))
    }
}

/// A node after the renderer has measured and positioned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GraphNode {
    pub id: ElementId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub position: XYPosition,
    /// Absolute position, including parent offsets.
    pub computed_position: XYPosition,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub dragging: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl GraphNode {
    pub fn from_node(node: &Node, dimensions: Dimensions) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            position: node.position,
            computed_position: node.position,
            dimensions,
            selected: false,
            dragging: false,
            label: node.label.clone(),
            class: node.class.clone(),
            data: node.data.clone(),
        }
    }
}

/// Rectangular bound `[[x0, y0], [x1, y1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent(pub [[f32; 2]; 2]);

/// Bound the viewport may be panned within.
pub type TranslateExtent = Extent;
/// Bound nodes may be dragged within.
pub type NodeExtent = Extent;

impl Extent {
    pub fn new(min: XYPosition, max: XYPosition) -> Self {
        Self([[min.x, min.y], [max.x, max.y]])
    }

    pub fn min(&self) -> XYPosition {
        XYPosition::new(self.0[0][0], self.0[0][1])
    }

    pub fn max(&self) -> XYPosition {
        XYPosition::new(self.0[1][0], self.0[1][1])
    }

    pub fn contains(&self, point: XYPosition) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Clamp a point into the extent.
    pub fn clamp(&self, point: XYPosition) -> XYPosition {
        let (min, max) = (self.min(), self.max());
        XYPosition::new(point.x.max(min.x).min(max.x), point.y.max(min.y).min(max.y))
    }

    pub(crate) fn check(&self, field: &'static str) -> Result<(), ContractError> {
        let (min, max) = (self.min(), self.max());
        // Infinite bounds are the usual way to say "unbounded"; only NaN and inversion are rejected.
        if min.x.is_nan() || min.y.is_nan() || max.x.is_nan() || max.y.is_nan() {
            return Err(self.inverted(field));
        }
        if min.x > max.x || min.y > max.y {
            return Err(self.inverted(field));
        }
        Ok(())
    }

    fn inverted(&self, field: &'static str) -> ContractError {
        ContractError::InvertedExtent {
            field,
            x0: self.0[0][0],
            y0: self.0[0][1],
            x1: self.0[1][0],
            y1: self.0[1][1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleType {
    Source,
    Target,
}

/// A measured connection handle on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct HandleElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub position: Position,
}

impl HandleElement {
    /// Point where a connection line attaches, on the side named by `position`.
    pub fn anchor(&self) -> XYPosition {
        match self.position {
            Position::Left => XYPosition::new(self.x, self.y + self.height / 2.0),
            Position::Right => XYPosition::new(self.x + self.width, self.y + self.height / 2.0),
            Position::Top => XYPosition::new(self.x + self.width / 2.0, self.y),
            Position::Bottom => XYPosition::new(self.x + self.width / 2.0, self.y + self.height),
        }
    }
}
