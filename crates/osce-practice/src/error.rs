use thiserror::Error;

use osce_core::models::phase::{Phase, PhaseEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    #[error("cannot {attempted} during {current}")]
    InvalidTransition { current: Phase, attempted: PhaseEvent },

    #[error("{operation} is not available during {current}")]
    WrongPhase {
        current: Phase,
        operation: &'static str,
    },

    #[error("question is empty")]
    EmptyInput,

    #[error("patient reply is still pending")]
    ReplyPending,

    #[error("no case selected")]
    NoCaseSelected,

    #[error("session already finished")]
    AlreadyFinished,

    #[error("session is closed")]
    SessionClosed,

    #[error("rubric criterion {criterion} scored {value}, maximum is 2")]
    InvalidRubric { criterion: &'static str, value: u8 },
}
