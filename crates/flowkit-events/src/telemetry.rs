//! Lifecycle records of harness commands.
//!
//! A [`CommandSpan`] is opened when a command is dispatched, collects what the
//! command learned along the way (the selector it waited on, how many attempts
//! that took) and is closed into a [`CommandRecord`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

pub const TELEMETRY_TARGET: &str = "flowkit::events::telemetry";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    Succeeded,
    Failed,
}

/// Closed record of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub correlation_id: Uuid,
    pub command: String,
    pub outcome: CommandOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome == CommandOutcome::Succeeded
    }
}

/// An in-flight command.
#[derive(Debug)]
pub struct CommandSpan {
    correlation_id: Uuid,
    command: String,
    selector: Option<String>,
    attempts: Option<u32>,
}

impl CommandSpan {
    pub fn start(command: impl Into<String>) -> Self {
        let span = Self {
            correlation_id: Uuid::new_v4(),
            command: command.into(),
            selector: None,
            attempts: None,
        };
        info!(
            target: TELEMETRY_TARGET,
            command = %span.command,
            correlation_id = %span.correlation_id,
            "command_start"
        );
        span
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn set_selector(&mut self, selector: &str) {
        debug!(
            target: TELEMETRY_TARGET,
            correlation_id = %self.correlation_id,
            selector,
            "command_selector"
        );
        self.selector = Some(selector.to_string());
    }

    /// Number of times a retried assertion ran before settling.
    pub fn record_attempts(&mut self, attempts: u32) {
        self.attempts = Some(attempts);
    }

    pub fn succeed(self, elapsed: Duration) -> CommandRecord {
        let record = self.close(CommandOutcome::Succeeded, None, elapsed);
        info!(
            target: TELEMETRY_TARGET,
            command = %record.command,
            correlation_id = %record.correlation_id,
            attempts = ?record.attempts,
            elapsed_ms = record.elapsed_ms,
            "command_success"
        );
        record
    }

    pub fn fail(self, reason: &dyn fmt::Display, elapsed: Duration) -> CommandRecord {
        let record = self.close(CommandOutcome::Failed, Some(reason.to_string()), elapsed);
        error!(
            target: TELEMETRY_TARGET,
            command = %record.command,
            correlation_id = %record.correlation_id,
            selector = ?record.selector,
            attempts = ?record.attempts,
            elapsed_ms = record.elapsed_ms,
            error = record.error.as_deref().unwrap_or_default(),
            "command_failure"
        );
        record
    }

    fn close(self, outcome: CommandOutcome, error: Option<String>, elapsed: Duration) -> CommandRecord {
        CommandRecord {
            correlation_id: self.correlation_id,
            command: self.command,
            outcome,
            selector: self.selector,
            attempts: self.attempts,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            error,
        }
    }
}
