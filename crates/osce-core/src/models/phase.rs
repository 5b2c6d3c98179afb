use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A discrete stage of a practice encounter.
///
/// Declaration order is the forward order of the flow, so `Ord` compares
/// how far along a session is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Phase {
    CaseSelection,
    HistoryTaking,
    HistoryEvaluation,
    PhysicalExam,
    PhysicalEvaluation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::CaseSelection => "case_selection",
            Phase::HistoryTaking => "history_taking",
            Phase::HistoryEvaluation => "history_evaluation",
            Phase::PhysicalExam => "physical_exam",
            Phase::PhysicalEvaluation => "physical_evaluation",
        }
    }

    /// Whether the scoring calculator may run in this phase.
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Phase::HistoryEvaluation | Phase::PhysicalEvaluation)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to move a session between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PhaseEvent {
    SelectCase,
    AdvanceToEvaluation,
    AdvanceToPhysicalExam,
    ReturnToHistory,
    AdvanceToPhysicalEvaluation,
    FinishSession,
}

impl PhaseEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseEvent::SelectCase => "select_case",
            PhaseEvent::AdvanceToEvaluation => "advance_to_evaluation",
            PhaseEvent::AdvanceToPhysicalExam => "advance_to_physical_exam",
            PhaseEvent::ReturnToHistory => "return_to_history",
            PhaseEvent::AdvanceToPhysicalEvaluation => "advance_to_physical_evaluation",
            PhaseEvent::FinishSession => "finish_session",
        }
    }
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
