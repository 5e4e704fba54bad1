use crate::error::{HarnessError, Result};
use crate::retry::RetryOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a JSON harness config file.
pub const CONFIG_ENV_VAR: &str = "FLOWKIT_HARNESS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub retry: RetrySettings,
    pub flow: FlowMountSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            interval_ms: 20,
            timeout_ms: 1000,
        }
    }
}

impl RetrySettings {
    pub fn options(&self) -> RetryOptions {
        RetryOptions::from_millis(self.interval_ms, self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowMountSettings {
    pub id: String,
    pub fit_view_on_init: bool,
    pub key: String,
    pub width: String,
    pub height: String,
    /// Delay before mounted elements become queryable in the in-memory DOM.
    pub render_delay_ms: u64,
}

impl Default for FlowMountSettings {
    fn default() -> Self {
        Self {
            id: "test".to_string(),
            fit_view_on_init: true,
            key: "flowy".to_string(),
            width: "100vw".to_string(),
            height: "100vh".to_string(),
            render_delay_ms: 0,
        }
    }
}

impl HarnessConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(HarnessError::ConfigParse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::info!("Loading harness config from {:?}", path);
                match Self::load(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::error!("Failed to load harness config: {}", e);
                        Self::default()
                    }
                }
            }
            None => {
                tracing::debug!("{} not set, using default harness config", CONFIG_ENV_VAR);
                Self::default()
            }
        }
    }
}
