//! Keyword-based history coverage detection.
//!
//! Marks which history-taking items the student asked about. Stands in for
//! an upstream language-model detector; results can be overwritten through
//! [`crate::session::PracticeSession::record_history_checklist`].

use osce_core::models::exam::HistoryChecklist;
use osce_core::models::message::{MessageRole, SessionMessage};

const CHIEF_COMPLAINT: &[&str] = &[
    "what brings",
    "what's wrong",
    "what is wrong",
    "problem",
    "complaint",
    "how can i help",
    "what happened",
    "trouble",
];

const ONSET_DURATION: &[&str] = &[
    "when did",
    "how long",
    "start",
    "began",
    "begin",
    "onset",
    "since",
];

const ASSOCIATED_SYMPTOMS: &[&str] = &[
    "other symptom",
    "anything else",
    "fever",
    "cough",
    "nausea",
    "vomit",
    "breath",
    "sweat",
    "radiat",
];

const PAST_MEDICAL_HISTORY: &[&str] = &[
    "medical history",
    "past",
    "condition",
    "illness",
    "surgery",
    "operation",
    "hospital",
    "before",
];

const MEDICATIONS_ALLERGIES: &[&str] = &[
    "medication",
    "medicine",
    "tablet",
    "drug",
    "inhaler",
    "allerg",
];

/// Scan student questions for each history item.
pub fn detect_history_coverage(messages: &[SessionMessage]) -> HistoryChecklist {
    let questions: Vec<String> = messages
        .iter()
        .filter(|m| m.role == MessageRole::Student)
        .map(|m| m.content.to_lowercase())
        .collect();

    let asked = |keywords: &[&str]| {
        questions
            .iter()
            .any(|q| keywords.iter().any(|k| q.contains(k)))
    };

    HistoryChecklist {
        chief_complaint: asked(CHIEF_COMPLAINT),
        onset_duration: asked(ONSET_DURATION),
        associated_symptoms: asked(ASSOCIATED_SYMPTOMS),
        past_medical_history: asked(PAST_MEDICAL_HISTORY),
        medications_allergies: asked(MEDICATIONS_ALLERGIES),
    }
}
