//! Pattern drawn behind the viewport.

use crate::error::ContractError;
use crate::validate::{Validate, non_negative};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_GAP: f32 = 10.0;
pub const DEFAULT_BACKGROUND_SIZE: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundVariant {
    #[default]
    Dots,
    Lines,
}

impl BackgroundVariant {
    /// Pattern colour used when `color` is not given.
    pub fn default_color(self) -> &'static str {
        match self {
            BackgroundVariant::Dots => "#81818a",
            BackgroundVariant::Lines => "#eee",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BackgroundProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<BackgroundVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

impl BackgroundProps {
    pub fn variant(&self) -> BackgroundVariant {
        self.variant.unwrap_or_default()
    }

    pub fn gap(&self) -> f32 {
        self.gap.unwrap_or(DEFAULT_BACKGROUND_GAP)
    }

    pub fn size(&self) -> f32 {
        self.size.unwrap_or(DEFAULT_BACKGROUND_SIZE)
    }

    pub fn color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| self.variant().default_color())
    }
}

impl Validate for BackgroundProps {
    fn validate(&self) -> Result<(), ContractError> {
        non_negative("gap", self.gap)?;
        non_negative("size", self.size)?;
        Ok(())
    }
}
