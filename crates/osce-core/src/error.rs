use thiserror::Error;

/// Failures parsing domain values from their wire names.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown checklist item: {0}")]
    UnknownChecklistItem(String),

    #[error("unknown session mode: {0}")]
    UnknownMode(String),

    #[error("unknown user role: {0}")]
    UnknownRole(String),
}
