use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Student-entered answers on the evaluation screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct EvaluationInputs {
    pub red_flag_recognized: bool,
    /// Case id of the diagnosis the student picked.
    pub selected_diagnosis: Option<String>,
    /// 0–100.
    pub diagnosis_confidence: u8,
    pub diagnosis_rationale: String,
}

/// Examiner rubric. Each criterion is scored 0–2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RubricScores {
    pub communication: u8,
    pub structure: u8,
    pub safety: u8,
    pub clinical_reasoning: u8,
    pub professionalism: u8,
}

impl RubricScores {
    pub const MAX_PER_CRITERION: u8 = 2;
    pub const MAX_TOTAL: u8 = 10;

    fn criteria(&self) -> [(&'static str, u8); 5] {
        [
            ("communication", self.communication),
            ("structure", self.structure),
            ("safety", self.safety),
            ("clinical_reasoning", self.clinical_reasoning),
            ("professionalism", self.professionalism),
        ]
    }

    pub fn total(&self) -> u8 {
        self.criteria().iter().map(|(_, v)| *v).sum()
    }

    /// Name of the first criterion scored above the maximum, if any.
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        self.criteria()
            .into_iter()
            .find(|(_, v)| *v > Self::MAX_PER_CRITERION)
    }
}

/// Output of the scoring calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    /// 0.0–10.0.
    pub score: f64,
    pub feedback: String,
}
