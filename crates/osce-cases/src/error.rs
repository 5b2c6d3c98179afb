use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("unknown case: {0}")]
    UnknownCase(String),
}
