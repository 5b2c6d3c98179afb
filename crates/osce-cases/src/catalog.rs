use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use osce_core::models::case::{CaseCategory, CaseSummary};

use crate::error::CaseError;
use crate::{all_cases, ClinicalCase};

/// Shared, read-only set of cases available for selection.
#[derive(Clone)]
pub struct CaseCatalog {
    cases: Vec<Arc<dyn ClinicalCase>>,
}

/// Case detail shown on the selection screen. Replies and findings stay
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseDetail {
    pub id: String,
    pub title: String,
    pub category: CaseCategory,
    pub symptoms: Vec<String>,
}

impl CaseCatalog {
    /// Catalog of every built-in case.
    pub fn builtin() -> Self {
        Self::new(all_cases().into_iter().map(Arc::from).collect())
    }

    pub fn new(cases: Vec<Arc<dyn ClinicalCase>>) -> Self {
        Self { cases }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn ClinicalCase>> {
        self.cases.iter().find(|c| c.id() == id).cloned()
    }

    pub fn require(&self, id: &str) -> Result<Arc<dyn ClinicalCase>, CaseError> {
        self.get(id)
            .ok_or_else(|| CaseError::UnknownCase(id.to_string()))
    }

    pub fn summaries(&self) -> Vec<CaseSummary> {
        self.cases.iter().map(|c| c.summary()).collect()
    }

    pub fn detail(&self, id: &str) -> Result<CaseDetail, CaseError> {
        let case = self.require(id)?;
        Ok(CaseDetail {
            id: case.id().to_string(),
            title: case.title().to_string(),
            category: case.category(),
            symptoms: case.symptoms().iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl Default for CaseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
