use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Organ system a body zone examines. Case findings are keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrganSystem {
    Neurological,
    HeadNeck,
    Respiratory,
    Cardiovascular,
    Abdominal,
    Extremities,
}

impl fmt::Display for OrganSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrganSystem::Neurological => "neurological",
            OrganSystem::HeadNeck => "head_neck",
            OrganSystem::Respiratory => "respiratory",
            OrganSystem::Cardiovascular => "cardiovascular",
            OrganSystem::Abdominal => "abdominal",
            OrganSystem::Extremities => "extremities",
        };
        f.write_str(s)
    }
}

/// A clickable body-surface location on the manikin diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BodyZone {
    pub id: String,
    pub label: String,
    pub organ_system: OrganSystem,
}
