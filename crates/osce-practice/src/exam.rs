//! Physical exam lookups and the bounded exam log.

use std::collections::VecDeque;

use osce_cases::ClinicalCase;
use osce_core::models::exam::ExamEntry;
use osce_core::models::zone::OrganSystem;

/// Finding reported when a case has nothing specific for a zone.
pub const NORMAL_FINDINGS: &str = "Normal findings";

/// Finding for `system` under `case`, or [`NORMAL_FINDINGS`].
pub fn finding_for(case: &dyn ClinicalCase, system: OrganSystem) -> &str {
    case.finding(system).unwrap_or(NORMAL_FINDINGS)
}

/// Most-recent-first log of examined zones, holding at most
/// [`ExamLog::CAPACITY`] entries.
#[derive(Debug, Clone, Default)]
pub struct ExamLog {
    entries: VecDeque<ExamEntry>,
}

impl ExamLog {
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, evicting the oldest entry when full.
    pub fn record(&mut self, entry: ExamEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(Self::CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ExamEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExamEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<ExamEntry> {
        self.entries.iter().cloned().collect()
    }
}
