use serde::{Deserialize, Serialize};
use std::fmt;

pub mod background;
pub mod connection;
pub mod connection_line;
pub mod controls;
pub mod edge_text;
pub mod error;
pub mod flow;
pub mod minimap;
pub mod node;
pub mod style;
pub mod validate;
pub mod zoom;

pub use background::{BackgroundProps, BackgroundVariant};
pub use connection::{Connection, ConnectionLineType, ConnectionMode, ValidConnectionFunc};
pub use connection_line::CustomConnectionLineProps;
pub use controls::{ControlEvent, ControlProps};
pub use edge_text::{EdgeLabel, EdgeTextProps, LabelComponent};
pub use error::ContractError;
pub use flow::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, FlowProps, Loading, clamp_zoom};
pub use minimap::{
    MiniMapNodeProps, MiniMapProps, NodeRef, NodeStyleValue, ShapeRendering, StringFunc,
};
pub use node::{
    Edge, Extent, FlowElement, GraphNode, HandleElement, HandleType, Node, NodeExtent,
    TranslateExtent,
};
pub use style::Style;
pub use validate::{Validate, parse_props, props_from_value};
pub use zoom::{FitViewParams, KeyCode, PanOnScrollMode};

/// Identifier of a node, edge or handle as it appears in the flow elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XYPosition {
    pub x: f32,
    pub y: f32,
}

impl XYPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

/// Side of a node a handle is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Top,
    Right,
    Bottom,
}
