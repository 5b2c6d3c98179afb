//! Central transition table for the encounter flow.

use std::collections::HashMap;
use std::sync::LazyLock;

use osce_core::models::phase::{Phase, PhaseEvent};
use osce_core::models::session::SessionMode;

static TRANSITIONS: LazyLock<HashMap<(Phase, PhaseEvent), Phase>> = LazyLock::new(|| {
    HashMap::from([
        (
            (Phase::CaseSelection, PhaseEvent::SelectCase),
            Phase::HistoryTaking,
        ),
        (
            (Phase::HistoryTaking, PhaseEvent::AdvanceToEvaluation),
            Phase::HistoryEvaluation,
        ),
        (
            (Phase::HistoryEvaluation, PhaseEvent::AdvanceToPhysicalExam),
            Phase::PhysicalExam,
        ),
        (
            (Phase::PhysicalExam, PhaseEvent::ReturnToHistory),
            Phase::HistoryTaking,
        ),
        (
            (Phase::PhysicalExam, PhaseEvent::AdvanceToPhysicalEvaluation),
            Phase::PhysicalEvaluation,
        ),
        // Terminal: finishing keeps the phase and starts the countdown.
        (
            (Phase::PhysicalEvaluation, PhaseEvent::FinishSession),
            Phase::PhysicalEvaluation,
        ),
    ])
});

/// Resolve the target phase for `event`, or `None` if the graph has no such
/// edge for this session mode.
pub fn resolve(current: Phase, event: PhaseEvent, mode: SessionMode) -> Option<Phase> {
    if event == PhaseEvent::ReturnToHistory && mode == SessionMode::Exam {
        return None;
    }
    TRANSITIONS.get(&(current, event)).copied()
}

/// The single forward step out of `current`, if one exists without extra
/// input. Case selection needs a case and the terminal phase only finishes.
pub fn forward_event(current: Phase) -> Option<PhaseEvent> {
    match current {
        Phase::HistoryTaking => Some(PhaseEvent::AdvanceToEvaluation),
        Phase::HistoryEvaluation => Some(PhaseEvent::AdvanceToPhysicalExam),
        Phase::PhysicalExam => Some(PhaseEvent::AdvanceToPhysicalEvaluation),
        Phase::CaseSelection | Phase::PhysicalEvaluation => None,
    }
}

/// Events accepted from `current` in the given mode.
pub fn available_events(current: Phase, mode: SessionMode) -> Vec<PhaseEvent> {
    let mut events: Vec<PhaseEvent> = TRANSITIONS
        .keys()
        .filter(|(phase, event)| *phase == current && resolve(current, *event, mode).is_some())
        .map(|(_, event)| *event)
        .collect();
    events.sort_by_key(|e| e.as_str());
    events
}
