use crate::error::ContractError;
use crate::validate::Validate;
use crate::zoom::FitViewParams;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ControlProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_zoom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_fit_view: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_interactive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_view_params: Option<FitViewParams>,
}

impl ControlProps {
    // Every button is shown unless explicitly disabled.
    pub fn shows_zoom(&self) -> bool {
        self.show_zoom.unwrap_or(true)
    }

    pub fn shows_fit_view(&self) -> bool {
        self.show_fit_view.unwrap_or(true)
    }

    pub fn shows_interactive(&self) -> bool {
        self.show_interactive.unwrap_or(true)
    }
}

impl Validate for ControlProps {
    fn validate(&self) -> Result<(), ContractError> {
        match &self.fit_view_params {
            Some(params) => params.validate(),
            None => Ok(()),
        }
    }
}

/// Events emitted by the controls panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ControlEvent {
    ZoomIn,
    ZoomOut,
    FitView,
    InteractionChange { active: bool },
}

impl ControlEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControlEvent::ZoomIn => "zoom-in",
            ControlEvent::ZoomOut => "zoom-out",
            ControlEvent::FitView => "fit-view",
            ControlEvent::InteractionChange { .. } => "interaction-change",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEvent::InteractionChange { active } => write!(f, "{}({active})", self.name()),
            _ => write!(f, "{}", self.name()),
        }
    }
}
