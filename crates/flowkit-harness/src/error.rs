use flowkit_core::ContractError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Command already registered: {0}")]
    DuplicateCommand(String),
    #[error("No element matches selector {selector}")]
    ElementNotFound { selector: String },
    #[error("Unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("Invalid props for {component}: {source}")]
    InvalidProps {
        component: String,
        #[source]
        source: ContractError,
    },
    #[error("Invalid arguments for {command}: {source}")]
    InvalidArguments {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode result of {command}: {source}")]
    EncodeResult {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
