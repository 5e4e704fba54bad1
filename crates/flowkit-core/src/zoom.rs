use crate::error::ContractError;
use crate::validate::{Validate, non_negative};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A key binding, either a key name (`"Shift"`, `"Backspace"`) or a numeric key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyCode {
    Name(String),
    Code(u32),
}

impl KeyCode {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyCode::Name(name) => name.eq_ignore_ascii_case(key),
            KeyCode::Code(code) => key.parse::<u32>().is_ok_and(|k| k == *code),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Name(name) => write!(f, "{name}"),
            KeyCode::Code(code) => write!(f, "{code}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanOnScrollMode {
    #[default]
    Free,
    Vertical,
    Horizontal,
}

/// Options for fitting the viewport around the rendered nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FitViewParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_hidden_nodes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f32>,
}

impl Validate for FitViewParams {
    fn validate(&self) -> Result<(), ContractError> {
        non_negative("fitViewParams.padding", self.padding)?;
        non_negative("fitViewParams.minZoom", self.min_zoom)?;
        non_negative("fitViewParams.maxZoom", self.max_zoom)?;
        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom)
            && min > max
        {
            return Err(ContractError::ZoomRange { min, max });
        }
        Ok(())
    }
}
