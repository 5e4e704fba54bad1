use crate::error::ContractError;
use crate::style::Style;
use crate::validate::{Validate, non_negative};
use serde::{Deserialize, Serialize};

/// A custom component rendered in place of a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelComponent {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeLabel {
    Text(String),
    Component(LabelComponent),
}

/// Label drawn at the middle of an edge. `x` and `y` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EdgeTextProps {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_show_bg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_padding: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_border_radius: Option<f32>,
}

impl EdgeTextProps {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            label: None,
            label_style: None,
            label_show_bg: None,
            label_bg_style: None,
            label_bg_padding: None,
            label_bg_border_radius: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.label = Some(EdgeLabel::Text(text.to_string()));
        self
    }

    pub fn shows_background(&self) -> bool {
        self.label_show_bg.unwrap_or(true)
    }

    pub fn background_padding(&self) -> [f32; 2] {
        self.label_bg_padding.unwrap_or([2.0, 4.0])
    }
}

impl Validate for EdgeTextProps {
    fn validate(&self) -> Result<(), ContractError> {
        if let Some([px, py]) = self.label_bg_padding {
            non_negative("labelBgPadding[0]", Some(px))?;
            non_negative("labelBgPadding[1]", Some(py))?;
        }
        non_negative("labelBgBorderRadius", self.label_bg_border_radius)?;
        Ok(())
    }
}
