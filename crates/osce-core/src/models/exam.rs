use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One line of the physical exam log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamEntry {
    pub zone_label: String,
    pub finding: String,
    pub timestamp: jiff::Timestamp,
}

/// Examination techniques the student has performed during the physical exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamChecklist {
    pub inspection: bool,
    pub palpation: bool,
    pub percussion: bool,
    pub auscultation: bool,
}

impl ExamChecklist {
    pub fn get(&self, item: ChecklistItem) -> bool {
        match item {
            ChecklistItem::Inspection => self.inspection,
            ChecklistItem::Palpation => self.palpation,
            ChecklistItem::Percussion => self.percussion,
            ChecklistItem::Auscultation => self.auscultation,
        }
    }

    pub fn set(&mut self, item: ChecklistItem, value: bool) {
        let slot = match item {
            ChecklistItem::Inspection => &mut self.inspection,
            ChecklistItem::Palpation => &mut self.palpation,
            ChecklistItem::Percussion => &mut self.percussion,
            ChecklistItem::Auscultation => &mut self.auscultation,
        };
        *slot = value;
    }

    /// Flip an item and return its new value.
    pub fn toggle(&mut self, item: ChecklistItem) -> bool {
        let value = !self.get(item);
        self.set(item, value);
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChecklistItem {
    Inspection,
    Palpation,
    Percussion,
    Auscultation,
}

impl FromStr for ChecklistItem {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inspection" => Ok(ChecklistItem::Inspection),
            "palpation" => Ok(ChecklistItem::Palpation),
            "percussion" => Ok(ChecklistItem::Percussion),
            "auscultation" => Ok(ChecklistItem::Auscultation),
            other => Err(CoreError::UnknownChecklistItem(other.to_string())),
        }
    }
}

/// History-taking items detected in the student's questions.
///
/// Independent of [`ExamChecklist`]; filled by a detector upstream of
/// scoring, never by the student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryChecklist {
    pub chief_complaint: bool,
    pub onset_duration: bool,
    pub associated_symptoms: bool,
    pub past_medical_history: bool,
    pub medications_allergies: bool,
}

impl HistoryChecklist {
    pub const ITEM_COUNT: usize = 5;

    pub fn all_covered() -> Self {
        Self {
            chief_complaint: true,
            onset_duration: true,
            associated_symptoms: true,
            past_medical_history: true,
            medications_allergies: true,
        }
    }

    /// Number of items marked as covered.
    pub fn covered(&self) -> usize {
        [
            self.chief_complaint,
            self.onset_duration,
            self.associated_symptoms,
            self.past_medical_history,
            self.medications_allergies,
        ]
        .into_iter()
        .filter(|covered| *covered)
        .count()
    }
}
