//! Props of the root flow component.
//!
//! This is the configuration surface of the renderer: render toggles, zoom and
//! pan bounds, key bindings and the optional storage key used to persist the
//! flow state between sessions.

use crate::connection::{ConnectionLineType, ConnectionMode};
use crate::error::ContractError;
use crate::node::{FlowElement, NodeExtent, TranslateExtent};
use crate::style::Style;
use crate::validate::{Validate, non_negative, positive};
use crate::zoom::{KeyCode, PanOnScrollMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MIN_ZOOM: f32 = 0.5;
pub const DEFAULT_MAX_ZOOM: f32 = 2.0;
pub const DEFAULT_SNAP_GRID: [f32; 2] = [15.0, 15.0];

/// Loading indicator: a flag, or a label to display while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loading {
    Flag(bool),
    Label(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FlowProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_value: Option<Vec<FlowElement>>,
    /// Node type name -> component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_types: Option<BTreeMap<String, String>>,
    /// Edge type name -> component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_types: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_mode: Option<ConnectionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_line_type: Option<ConnectionLineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_line_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_key_code: Option<KeyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_key_code: Option<KeyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_selection_key_code: Option<KeyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_activation_key_code: Option<KeyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevent_scrolling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_to_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_grid: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_render_visible_elements: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_connectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements_selectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_nodes_on_drag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_moveable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_zoom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_position: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_extent: Option<TranslateExtent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_extent: Option<NodeExtent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_head_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_on_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_on_pinch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_on_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_on_scroll_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_on_scroll_mode: Option<PanOnScrollMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_on_double_click: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_updater_radius: Option<f32>,
    /// Key under which the flow state is persisted. Only the name is part of the contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<Loading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_view_on_init: Option<bool>,
}

impl FlowProps {
    /// Effective `(min, max)` zoom bounds.
    pub fn zoom_bounds(&self) -> (f32, f32) {
        (
            self.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM),
            self.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM),
        )
    }

    /// Clamp into the zoom bounds. Unvalidated props with inverted bounds
    /// resolve to `maxZoom`.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        let (min, max) = self.zoom_bounds();
        clamp_zoom(zoom, min, max)
    }

    /// Zoom applied on first render, clamped into the zoom bounds.
    pub fn initial_zoom(&self) -> f32 {
        self.clamp_zoom(self.default_zoom.unwrap_or(1.0))
    }

    pub fn snap_grid(&self) -> [f32; 2] {
        self.snap_grid.unwrap_or(DEFAULT_SNAP_GRID)
    }

    /// Snap a point to the grid when `snapToGrid` is on; identity otherwise.
    pub fn snap(&self, x: f32, y: f32) -> (f32, f32) {
        if !self.snap_to_grid.unwrap_or(false) {
            return (x, y);
        }
        let [gx, gy] = self.snap_grid();
        ((x / gx).round() * gx, (y / gy).round() * gy)
    }

    pub fn elements(&self) -> &[FlowElement] {
        self.model_value.as_deref().unwrap_or_default()
    }
}

/// `zoom` bounded below by `min` and above by `max`, without panicking when
/// the bounds are inverted or NaN.
pub fn clamp_zoom(zoom: f32, min: f32, max: f32) -> f32 {
    zoom.max(min).min(max)
}

impl Validate for FlowProps {
    fn validate(&self) -> Result<(), ContractError> {
        non_negative("minZoom", self.min_zoom)?;
        non_negative("maxZoom", self.max_zoom)?;
        non_negative("defaultZoom", self.default_zoom)?;
        non_negative("panOnScrollSpeed", self.pan_on_scroll_speed)?;
        non_negative("edgeUpdaterRadius", self.edge_updater_radius)?;

        let (min, max) = self.zoom_bounds();
        if min > max {
            return Err(ContractError::ZoomRange { min, max });
        }
        if let Some(zoom) = self.default_zoom
            && (zoom < min || zoom > max)
        {
            return Err(ContractError::DefaultZoomOutOfRange { zoom, min, max });
        }

        if let Some([gx, gy]) = self.snap_grid {
            positive("snapGrid[0]", gx)?;
            positive("snapGrid[1]", gy)?;
        }
        if let Some(extent) = &self.translate_extent {
            extent.check("translateExtent")?;
        }
        if let Some(extent) = &self.node_extent {
            extent.check("nodeExtent")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any ordered pair of non-negative zoom bounds validates, and every zoom
        /// clamps into the bounds.
        #[test]
        fn prop_ordered_zoom_bounds_validate(
            a in 0.0f32..10.0,
            b in 0.0f32..10.0,
            zoom in -5.0f32..20.0,
        ) {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            let props = FlowProps {
                min_zoom: Some(min),
                max_zoom: Some(max),
                ..Default::default()
            };
            prop_assert!(props.validate().is_ok());
            let clamped = props.clamp_zoom(zoom);
            prop_assert!(clamped >= min && clamped <= max);
        }

        /// Inverted bounds are always rejected.
        #[test]
        fn prop_inverted_zoom_bounds_rejected(min in 0.01f32..10.0, delta in 0.01f32..5.0) {
            let props = FlowProps {
                min_zoom: Some(min + delta),
                max_zoom: Some(min),
                ..Default::default()
            };
            let is_zoom_range_error = matches!(props.validate(), Err(ContractError::ZoomRange { .. }));
            prop_assert!(is_zoom_range_error);
        }
    }
}
