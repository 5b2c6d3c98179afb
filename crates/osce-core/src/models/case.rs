use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CaseCategory {
    Respiratory,
    Cardiovascular,
    Gastrointestinal,
    Neurological,
}

/// Directory listing entry for a simulated case.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseSummary {
    pub id: String,
    pub title: String,
    pub category: CaseCategory,
}
