use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single line in the encounter transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: jiff::Timestamp,
}

impl SessionMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: jiff::Timestamp::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MessageRole {
    System,
    Student,
    Patient,
    /// Clinical alerts raised by the simulation, e.g. deterioration.
    Alert,
}
