use crate::connection::ConnectionLineType;
use crate::error::ContractError;
use crate::node::{GraphNode, HandleElement};
use crate::style::Style;
use crate::validate::Validate;
use crate::{Position, XYPosition};
use serde::{Deserialize, Serialize};

/// Props handed to a user-supplied connection line component while a
/// connection is being dragged. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CustomConnectionLineProps {
    pub source_x: f32,
    pub source_y: f32,
    pub source_position: Position,
    pub target_x: f32,
    pub target_y: f32,
    pub target_position: Position,
    pub connection_line_type: ConnectionLineType,
    pub connection_line_style: Style,
    pub nodes: Vec<GraphNode>,
    pub source_node: GraphNode,
    pub source_handle: HandleElement,
}

impl CustomConnectionLineProps {
    pub fn source(&self) -> XYPosition {
        XYPosition::new(self.source_x, self.source_y)
    }

    pub fn target(&self) -> XYPosition {
        XYPosition::new(self.target_x, self.target_y)
    }
}

impl Validate for CustomConnectionLineProps {
    // Coordinates may be anywhere on the pane, negative included.
    fn validate(&self) -> Result<(), ContractError> {
        Ok(())
    }
}
