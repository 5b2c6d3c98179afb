//! The practice session: one simulated encounter from case selection to
//! scoring.
//!
//! All mutable encounter state lives on [`PracticeSession`], including every
//! armed timer handle. Phase changes go through [`PracticeSession::apply`],
//! which consults the transition table in [`crate::phase`] and runs the
//! exit/entry effects that arm and cancel timers. Rejected calls never
//! mutate state.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use osce_cases::zones::get_zone;
use osce_cases::ClinicalCase;
use osce_core::models::case::CaseSummary;
use osce_core::models::evaluation::{Evaluation, EvaluationInputs, RubricScores};
use osce_core::models::exam::{ChecklistItem, ExamChecklist, ExamEntry, HistoryChecklist};
use osce_core::models::message::{MessageRole, SessionMessage};
use osce_core::models::phase::{Phase, PhaseEvent};
use osce_core::models::session::SessionMode;
use osce_core::models::vitals::Vitals;
use osce_core::models::zone::BodyZone;

use crate::conversation::{normalize_question, ResponseSource};
use crate::error::PracticeError;
use crate::exam::{finding_for, ExamLog, NORMAL_FINDINGS};
use crate::history::detect_history_coverage;
use crate::phase;
use crate::scoring::{self, ScoreInputs};
use crate::timer::{TimerHandle, TimerKind, TimerWheel};

pub const DETERIORATION_ALERT: &str = "Patient condition worsening! SpO₂ dropping rapidly.";

/// Timer durations for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub deterioration_after: Duration,
    pub reply_delay: Duration,
    pub countdown_secs: u32,
}

impl SessionTiming {
    const TICK: Duration = Duration::from_secs(1);
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            deterioration_after: Duration::from_secs(60),
            reply_delay: Duration::from_millis(500),
            countdown_secs: 10,
        }
    }
}

/// Something observable that happened inside the session. Drained by the
/// owner with [`PracticeSession::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionEvent {
    PhaseChanged { from: Phase, to: Phase },
    PatientReplied { content: String },
    Deteriorated { vitals: Vitals },
    CountdownTick { remaining: u32 },
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Open,
    CountingDown { remaining: u32 },
    TornDown,
}

/// Serializable view of a session for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub station_id: String,
    pub mode: SessionMode,
    pub phase: Phase,
    /// Phase events the session would accept right now.
    pub available_events: Vec<PhaseEvent>,
    pub case: Option<CaseSummary>,
    pub messages: Vec<SessionMessage>,
    pub vitals: Vitals,
    pub has_deteriorated: bool,
    pub elapsed_seconds: u64,
    pub exam_log: Vec<ExamEntry>,
    pub exam_checklist: ExamChecklist,
    pub history_checklist: HistoryChecklist,
    pub evaluation: EvaluationInputs,
    pub reply_pending: bool,
    /// Seconds left before automatic teardown, once finished.
    pub countdown: Option<u32>,
    pub closed: bool,
    pub result: Option<Evaluation>,
}

pub struct PracticeSession {
    id: Uuid,
    station_id: String,
    mode: SessionMode,
    timing: SessionTiming,
    responder: Arc<dyn ResponseSource>,

    phase: Phase,
    case: Option<Arc<dyn ClinicalCase>>,
    messages: Vec<SessionMessage>,
    vitals: Vitals,
    has_deteriorated: bool,
    elapsed_seconds: u64,
    exam_log: ExamLog,
    exam_checklist: ExamChecklist,
    history_checklist: HistoryChecklist,
    history_checklist_recorded: bool,
    rubric: RubricScores,
    evaluation: EvaluationInputs,
    completion: Completion,
    result: Option<Evaluation>,

    timers: TimerWheel,
    tick_timer: Option<TimerHandle>,
    deterioration_timer: Option<TimerHandle>,
    reply_timer: Option<TimerHandle>,
    countdown_timer: Option<TimerHandle>,

    events: Vec<SessionEvent>,
}

impl PracticeSession {
    pub fn new(
        station_id: impl Into<String>,
        mode: SessionMode,
        responder: Arc<dyn ResponseSource>,
        timing: SessionTiming,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id: station_id.into(),
            mode,
            timing,
            responder,
            phase: Phase::CaseSelection,
            case: None,
            messages: Vec::new(),
            vitals: Vitals::BASELINE,
            has_deteriorated: false,
            elapsed_seconds: 0,
            exam_log: ExamLog::new(),
            exam_checklist: ExamChecklist::default(),
            history_checklist: HistoryChecklist::default(),
            history_checklist_recorded: false,
            rubric: RubricScores::default(),
            evaluation: EvaluationInputs::default(),
            completion: Completion::Open,
            result: None,
            timers: TimerWheel::new(),
            tick_timer: None,
            deterioration_timer: None,
            reply_timer: None,
            countdown_timer: None,
            events: Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn case(&self) -> Option<&Arc<dyn ClinicalCase>> {
        self.case.as_ref()
    }

    pub fn messages(&self) -> &[SessionMessage] {
        &self.messages
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    pub fn has_deteriorated(&self) -> bool {
        self.has_deteriorated
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn exam_log(&self) -> &ExamLog {
        &self.exam_log
    }

    pub fn exam_checklist(&self) -> ExamChecklist {
        self.exam_checklist
    }

    pub fn history_checklist(&self) -> HistoryChecklist {
        self.history_checklist
    }

    pub fn evaluation(&self) -> &EvaluationInputs {
        &self.evaluation
    }

    pub fn rubric(&self) -> RubricScores {
        self.rubric
    }

    pub fn is_reply_pending(&self) -> bool {
        self.reply_timer.is_some()
    }

    pub fn countdown(&self) -> Option<u32> {
        match self.completion {
            Completion::CountingDown { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completion != Completion::Open
    }

    pub fn is_torn_down(&self) -> bool {
        self.completion == Completion::TornDown
    }

    /// Session clock, advanced only through [`Self::advance_clock`].
    pub fn clock(&self) -> Duration {
        self.timers.now()
    }

    /// Number of timers still armed. Zero after teardown.
    pub fn armed_timers(&self) -> usize {
        self.timers.armed_count()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            station_id: self.station_id.clone(),
            mode: self.mode,
            phase: self.phase,
            available_events: if self.is_finished() {
                Vec::new()
            } else {
                phase::available_events(self.phase, self.mode)
            },
            case: self.case.as_ref().map(|c| c.summary()),
            messages: self.messages.clone(),
            vitals: self.vitals,
            has_deteriorated: self.has_deteriorated,
            elapsed_seconds: self.elapsed_seconds,
            exam_log: self.exam_log.to_vec(),
            exam_checklist: self.exam_checklist,
            history_checklist: self.history_checklist,
            evaluation: self.evaluation.clone(),
            reply_pending: self.is_reply_pending(),
            countdown: self.countdown(),
            closed: self.is_torn_down(),
            result: self.result.clone(),
        }
    }

    // ── Phase transitions ────────────────────────────────────────────────────

    pub fn select_case(&mut self, case: Arc<dyn ClinicalCase>) -> Result<(), PracticeError> {
        self.ensure_open()?;
        self.check(PhaseEvent::SelectCase)?;
        self.case = Some(case);
        self.apply(PhaseEvent::SelectCase)?;
        Ok(())
    }

    pub fn advance_to_evaluation(&mut self) -> Result<(), PracticeError> {
        self.apply(PhaseEvent::AdvanceToEvaluation).map(|_| ())
    }

    pub fn advance_to_physical_exam(&mut self) -> Result<(), PracticeError> {
        self.apply(PhaseEvent::AdvanceToPhysicalExam).map(|_| ())
    }

    /// Go back from the physical exam to history taking. Training mode only.
    pub fn return_to_history(&mut self) -> Result<(), PracticeError> {
        self.apply(PhaseEvent::ReturnToHistory).map(|_| ())
    }

    pub fn advance_to_physical_evaluation(&mut self) -> Result<(), PracticeError> {
        self.apply(PhaseEvent::AdvanceToPhysicalEvaluation).map(|_| ())
    }

    /// Take the single forward step out of the current phase.
    pub fn advance(&mut self) -> Result<Phase, PracticeError> {
        self.ensure_open()?;
        let event = phase::forward_event(self.phase).ok_or(PracticeError::WrongPhase {
            current: self.phase,
            operation: "advance",
        })?;
        self.apply(event)
    }

    /// Score the session, mark it complete and start the teardown countdown.
    pub fn finish_session(&mut self) -> Result<Evaluation, PracticeError> {
        self.ensure_open()?;
        if self.is_finished() {
            return Err(PracticeError::AlreadyFinished);
        }
        self.apply(PhaseEvent::FinishSession)?;

        let result = self.compute_score()?;
        self.result = Some(result.clone());

        info!(
            session_id = %self.id,
            score = result.score,
            countdown_secs = self.timing.countdown_secs,
            "session finished"
        );

        if self.timing.countdown_secs == 0 {
            self.teardown();
        } else {
            self.completion = Completion::CountingDown {
                remaining: self.timing.countdown_secs,
            };
            self.countdown_timer = Some(
                self.timers
                    .arm_repeating(TimerKind::Countdown, SessionTiming::TICK),
            );
        }
        Ok(result)
    }

    /// Skip the rest of the completion countdown and tear down now.
    pub fn return_now(&mut self) -> Result<(), PracticeError> {
        self.ensure_open()?;
        if self.countdown().is_none() {
            return Err(PracticeError::WrongPhase {
                current: self.phase,
                operation: "return_now",
            });
        }
        self.teardown();
        Ok(())
    }

    /// Cancel every timer and close the session. Idempotent.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.timers.cancel_all();
        self.tick_timer = None;
        self.deterioration_timer = None;
        self.reply_timer = None;
        self.countdown_timer = None;
        self.completion = Completion::TornDown;
        self.events.push(SessionEvent::TornDown);
        info!(session_id = %self.id, "session torn down");
    }

    fn check(&self, event: PhaseEvent) -> Result<Phase, PracticeError> {
        phase::resolve(self.phase, event, self.mode).ok_or(PracticeError::InvalidTransition {
            current: self.phase,
            attempted: event,
        })
    }

    fn apply(&mut self, event: PhaseEvent) -> Result<Phase, PracticeError> {
        self.ensure_open()?;
        let next = self.check(event)?;
        if self.is_finished() {
            return Err(PracticeError::AlreadyFinished);
        }

        let from = self.phase;
        if from != next {
            self.exit_phase(from);
            self.phase = next;
            self.enter_phase(from, next);
            self.events.push(SessionEvent::PhaseChanged { from, to: next });
            info!(session_id = %self.id, %from, to = %next, %event, "phase changed");
        }
        Ok(next)
    }

    fn exit_phase(&mut self, phase: Phase) {
        if phase == Phase::HistoryTaking {
            for handle in [
                self.tick_timer.take(),
                self.deterioration_timer.take(),
                self.reply_timer.take(),
            ]
            .into_iter()
            .flatten()
            {
                self.timers.cancel(handle);
            }
        }
    }

    fn enter_phase(&mut self, from: Phase, to: Phase) {
        match to {
            Phase::HistoryTaking => {
                if from == Phase::CaseSelection {
                    let title = self
                        .case
                        .as_ref()
                        .map(|c| c.title().to_string())
                        .unwrap_or_default();
                    self.messages.push(SessionMessage::new(
                        MessageRole::System,
                        format!("Case started: {title}. Take a focused history from the patient."),
                    ));
                }
                self.tick_timer = Some(
                    self.timers
                        .arm_repeating(TimerKind::ElapsedTick, SessionTiming::TICK),
                );
                if !self.has_deteriorated {
                    self.deterioration_timer = Some(self.timers.arm_once(
                        TimerKind::Deterioration,
                        self.timing.deterioration_after,
                    ));
                }
            }
            Phase::HistoryEvaluation => {
                if !self.history_checklist_recorded {
                    self.history_checklist = detect_history_coverage(&self.messages);
                }
            }
            Phase::PhysicalExam if from == Phase::HistoryEvaluation => {
                self.exam_log.clear();
                self.exam_checklist = ExamChecklist::default();
            }
            _ => {}
        }
    }

    // ── Deterioration ────────────────────────────────────────────────────────

    /// Worsen the patient's vitals. Returns `false` if they had already
    /// deteriorated, in which case nothing changes.
    pub fn trigger_deterioration(&mut self) -> Result<bool, PracticeError> {
        self.ensure_open()?;
        if self.case.is_none() {
            return Err(PracticeError::NoCaseSelected);
        }
        Ok(self.deteriorate())
    }

    fn deteriorate(&mut self) -> bool {
        if self.has_deteriorated {
            return false;
        }
        if let Some(handle) = self.deterioration_timer.take() {
            self.timers.cancel(handle);
        }
        self.has_deteriorated = true;
        self.vitals.deteriorate();
        self.messages
            .push(SessionMessage::new(MessageRole::Alert, DETERIORATION_ALERT));
        self.events.push(SessionEvent::Deteriorated {
            vitals: self.vitals,
        });
        info!(session_id = %self.id, spo2 = self.vitals.spo2, "patient deteriorated");
        true
    }

    // ── Conversation ─────────────────────────────────────────────────────────

    /// Put a question to the patient. The reply arrives once the reply delay
    /// has elapsed on the session clock.
    pub fn ask(&mut self, question: &str) -> Result<(), PracticeError> {
        self.ensure_open()?;
        self.require_phase(Phase::HistoryTaking, "ask")?;
        let question = normalize_question(question)?;
        if self.reply_timer.is_some() {
            return Err(PracticeError::ReplyPending);
        }

        self.messages
            .push(SessionMessage::new(MessageRole::Student, question));
        self.reply_timer = Some(
            self.timers
                .arm_once(TimerKind::PatientReply, self.timing.reply_delay),
        );
        Ok(())
    }

    fn deliver_reply(&mut self) {
        let Some(case) = self.case.as_ref() else {
            return;
        };
        let content = self.responder.reply(case.id());
        self.messages
            .push(SessionMessage::new(MessageRole::Patient, content.clone()));
        self.events.push(SessionEvent::PatientReplied { content });
    }

    // ── Physical exam ────────────────────────────────────────────────────────

    /// Examine a body zone and log the finding for the active case.
    pub fn examine(&mut self, zone: &BodyZone) -> Result<ExamEntry, PracticeError> {
        self.ensure_open()?;
        self.require_phase(Phase::PhysicalExam, "examine")?;
        let case = self.case.as_ref().ok_or(PracticeError::NoCaseSelected)?;

        let finding = finding_for(case.as_ref(), zone.organ_system).to_string();
        Ok(self.log_exam(zone.label.clone(), finding))
    }

    /// Examine by zone id. Unknown zones report normal findings under their
    /// raw id rather than failing.
    pub fn examine_zone_id(&mut self, zone_id: &str) -> Result<ExamEntry, PracticeError> {
        match get_zone(zone_id) {
            Some(zone) => self.examine(zone),
            None => {
                self.ensure_open()?;
                self.require_phase(Phase::PhysicalExam, "examine")?;
                debug!(zone_id, "unknown zone examined");
                Ok(self.log_exam(zone_id.to_string(), NORMAL_FINDINGS.to_string()))
            }
        }
    }

    fn log_exam(&mut self, zone_label: String, finding: String) -> ExamEntry {
        let entry = ExamEntry {
            zone_label,
            finding,
            timestamp: jiff::Timestamp::now(),
        };
        self.exam_log.record(entry.clone());
        // Any zone click implies the student listened.
        self.exam_checklist.auscultation = true;
        entry
    }

    /// Flip one exam checklist item and return its new value.
    pub fn toggle_checklist_item(&mut self, item: ChecklistItem) -> Result<bool, PracticeError> {
        self.ensure_open()?;
        self.require_phase(Phase::PhysicalExam, "toggle_checklist_item")?;
        Ok(self.exam_checklist.toggle(item))
    }

    // ── Evaluation ───────────────────────────────────────────────────────────

    pub fn set_evaluation(&mut self, mut inputs: EvaluationInputs) -> Result<(), PracticeError> {
        self.ensure_open()?;
        self.require_evaluation_open("set_evaluation")?;
        inputs.diagnosis_confidence = inputs.diagnosis_confidence.min(100);
        self.evaluation = inputs;
        Ok(())
    }

    /// Store examiner rubric scores. Each criterion must be 0–2.
    pub fn record_rubric(&mut self, rubric: RubricScores) -> Result<(), PracticeError> {
        self.ensure_open()?;
        self.require_evaluation_open("record_rubric")?;
        if let Some((criterion, value)) = rubric.out_of_range() {
            return Err(PracticeError::InvalidRubric { criterion, value });
        }
        self.rubric = rubric;
        Ok(())
    }

    /// Override the detected history checklist with an upstream assessment.
    pub fn record_history_checklist(
        &mut self,
        checklist: HistoryChecklist,
    ) -> Result<(), PracticeError> {
        self.ensure_open()?;
        self.require_evaluation_open("record_history_checklist")?;
        self.history_checklist = checklist;
        self.history_checklist_recorded = true;
        Ok(())
    }

    /// Current score. Available once the session has reached history
    /// evaluation.
    pub fn score(&self) -> Result<Evaluation, PracticeError> {
        if self.phase < Phase::HistoryEvaluation {
            return Err(PracticeError::WrongPhase {
                current: self.phase,
                operation: "score",
            });
        }
        self.compute_score()
    }

    fn compute_score(&self) -> Result<Evaluation, PracticeError> {
        let case = self.case.as_ref().ok_or(PracticeError::NoCaseSelected)?;
        Ok(scoring::score(&ScoreInputs {
            history_checklist: &self.history_checklist,
            has_deteriorated: self.has_deteriorated,
            evaluation: &self.evaluation,
            case_id: Some(case.id()),
            rubric: &self.rubric,
        }))
    }

    // ── Clock ────────────────────────────────────────────────────────────────

    /// Move the session clock forward, firing every timer that falls due.
    pub fn advance_clock(&mut self, delta: Duration) {
        if self.is_torn_down() {
            return;
        }
        let until = self.timers.now() + delta;
        while let Some((handle, kind)) = self.timers.next_due(until) {
            self.fire(handle, kind);
        }
        self.timers.settle(until);
    }

    fn fire(&mut self, handle: TimerHandle, kind: TimerKind) {
        debug!(session_id = %self.id, ?kind, clock = ?self.timers.now(), "timer fired");
        match kind {
            TimerKind::ElapsedTick => {
                debug_assert_eq!(self.tick_timer, Some(handle));
                self.elapsed_seconds += 1;
            }
            TimerKind::Deterioration => {
                debug_assert_eq!(self.deterioration_timer, Some(handle));
                self.deterioration_timer = None;
                self.deteriorate();
            }
            TimerKind::PatientReply => {
                debug_assert_eq!(self.reply_timer, Some(handle));
                self.reply_timer = None;
                self.deliver_reply();
            }
            TimerKind::Countdown => {
                debug_assert_eq!(self.countdown_timer, Some(handle));
                if let Completion::CountingDown { remaining } = self.completion {
                    let remaining = remaining.saturating_sub(1);
                    self.completion = Completion::CountingDown { remaining };
                    self.events.push(SessionEvent::CountdownTick { remaining });
                    if remaining == 0 {
                        self.teardown();
                    }
                }
            }
        }
    }

    // ── Guards ───────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), PracticeError> {
        if self.is_torn_down() {
            return Err(PracticeError::SessionClosed);
        }
        Ok(())
    }

    fn require_phase(&self, phase: Phase, operation: &'static str) -> Result<(), PracticeError> {
        if self.phase != phase {
            return Err(PracticeError::WrongPhase {
                current: self.phase,
                operation,
            });
        }
        Ok(())
    }

    fn require_evaluation_open(&self, operation: &'static str) -> Result<(), PracticeError> {
        if self.phase < Phase::HistoryEvaluation {
            return Err(PracticeError::WrongPhase {
                current: self.phase,
                operation,
            });
        }
        if self.is_finished() {
            return Err(PracticeError::AlreadyFinished);
        }
        Ok(())
    }
}
