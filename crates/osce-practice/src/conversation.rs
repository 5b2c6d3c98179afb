//! Patient conversation: question validation and the reply source seam.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use osce_cases::catalog::CaseCatalog;

use crate::error::PracticeError;

/// Reply used when a case is unknown or has no reply pool.
pub const FALLBACK_REPLY: &str = "I'm sorry, doctor, I'm not sure how to answer that.";

/// Anything that can answer a student's question on behalf of the patient.
///
/// The built-in [`CannedReplies`] picks from the case's reply pool; an
/// inference backend can implement the same trait.
pub trait ResponseSource: Send + Sync {
    fn reply(&self, case_id: &str) -> String;
}

/// Uniform random choice from the case's canned reply pool.
pub struct CannedReplies {
    catalog: CaseCatalog,
    rng: Mutex<StdRng>,
}

impl CannedReplies {
    pub fn new(catalog: CaseCatalog) -> Self {
        Self {
            catalog,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence of replies, for reproducible runs.
    pub fn with_seed(catalog: CaseCatalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ResponseSource for CannedReplies {
    fn reply(&self, case_id: &str) -> String {
        let Some(case) = self.catalog.get(case_id) else {
            tracing::warn!(case_id, "reply requested for unknown case");
            return FALLBACK_REPLY.to_string();
        };

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        case.replies()
            .choose(&mut *rng)
            .map(|reply| reply.to_string())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

/// Trim a student question, rejecting empty or whitespace-only input.
pub fn normalize_question(question: &str) -> Result<&str, PracticeError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(PracticeError::EmptyInput);
    }
    Ok(trimmed)
}
