//! Evaluation scoring. Pure; the weights are fixed.

use osce_core::models::evaluation::{Evaluation, EvaluationInputs, RubricScores};
use osce_core::models::exam::HistoryChecklist;

pub const HISTORY_ITEM_WEIGHT: f64 = 0.5;
pub const RED_FLAG_WEIGHT: f64 = 1.5;
pub const DIAGNOSIS_WEIGHT: f64 = 1.5;
pub const RUBRIC_WEIGHT: f64 = 4.5;
pub const MAX_SCORE: f64 = 10.0;

pub const FEEDBACK_SAFETY: &str = "Safety concern: the patient deteriorated and the red flag was \
     not recognised. Reassess vital signs regularly and escalate early.";
pub const FEEDBACK_EXCELLENT: &str =
    "Excellent performance: thorough history, correct diagnosis and safe management.";
pub const FEEDBACK_GOOD: &str =
    "Good performance. Tighten up a few history items or your clinical reasoning.";
pub const FEEDBACK_ADEQUATE: &str =
    "Adequate performance. Review the key history items and red flags for this presentation.";
pub const FEEDBACK_KEEP_PRACTICING: &str =
    "Keep practicing. Focus on a structured history and recognising deterioration.";

/// Everything the calculator reads from a session.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub history_checklist: &'a HistoryChecklist,
    pub has_deteriorated: bool,
    pub evaluation: &'a EvaluationInputs,
    /// Id of the case being simulated; the correct diagnosis.
    pub case_id: Option<&'a str>,
    pub rubric: &'a RubricScores,
}

/// Score a session out of 10 and pick the feedback line.
pub fn score(inputs: &ScoreInputs<'_>) -> Evaluation {
    let history = HISTORY_ITEM_WEIGHT * inputs.history_checklist.covered() as f64;

    let red_flag = if inputs.has_deteriorated && inputs.evaluation.red_flag_recognized {
        RED_FLAG_WEIGHT
    } else {
        0.0
    };

    let diagnosis_correct = matches!(
        (inputs.evaluation.selected_diagnosis.as_deref(), inputs.case_id),
        (Some(chosen), Some(actual)) if chosen == actual
    );
    let diagnosis = if diagnosis_correct {
        DIAGNOSIS_WEIGHT
    } else {
        0.0
    };

    let rubric = RUBRIC_WEIGHT * (f64::from(inputs.rubric.total()) / f64::from(RubricScores::MAX_TOTAL));

    let score = (history + red_flag + diagnosis + rubric).clamp(0.0, MAX_SCORE);

    let missed_deterioration =
        inputs.has_deteriorated && !inputs.evaluation.red_flag_recognized;

    Evaluation {
        score,
        feedback: feedback(score, missed_deterioration).to_string(),
    }
}

fn feedback(score: f64, missed_deterioration: bool) -> &'static str {
    if missed_deterioration {
        FEEDBACK_SAFETY
    } else if score >= 8.0 {
        FEEDBACK_EXCELLENT
    } else if score >= 6.0 {
        FEEDBACK_GOOD
    } else if score >= 4.0 {
        FEEDBACK_ADEQUATE
    } else {
        FEEDBACK_KEEP_PRACTICING
    }
}
