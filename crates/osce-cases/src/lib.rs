//! osce-cases
//!
//! Simulated patient cases and the body-zone table. Pure data, loaded once
//! and shared read-only by every session.

pub mod cases;
pub mod catalog;
pub mod error;
pub mod zones;

use osce_core::models::case::{CaseCategory, CaseSummary};
use osce_core::models::zone::OrganSystem;

/// Trait implemented by each simulated case.
pub trait ClinicalCase: Send + Sync {
    /// Unique identifier, also the id students pick as their diagnosis
    /// (e.g. "pneumonia").
    fn id(&self) -> &str;

    /// Human-readable title (e.g. "Community-Acquired Pneumonia").
    fn title(&self) -> &str;

    fn category(&self) -> CaseCategory;

    /// Presenting symptoms, in the order they are shown to the student.
    fn symptoms(&self) -> &[&'static str];

    /// Canned patient replies. Sampled at random; duplicates weight a reply.
    fn replies(&self) -> &[&'static str];

    /// Physical exam findings keyed by organ system.
    fn findings(&self) -> &[(OrganSystem, &'static str)];

    /// Finding for one organ system, if the case defines one.
    fn finding(&self, system: OrganSystem) -> Option<&str> {
        self.findings()
            .iter()
            .find(|(s, _)| *s == system)
            .map(|(_, finding)| *finding)
    }

    fn summary(&self) -> CaseSummary {
        CaseSummary {
            id: self.id().to_string(),
            title: self.title().to_string(),
            category: self.category(),
        }
    }
}

/// Return all built-in cases.
pub fn all_cases() -> Vec<Box<dyn ClinicalCase>> {
    vec![
        Box::new(cases::pneumonia::Pneumonia),
        Box::new(cases::myocardial_infarction::MyocardialInfarction),
        Box::new(cases::asthma::AcuteAsthma),
        Box::new(cases::appendicitis::Appendicitis),
    ]
}

/// Look up a built-in case by ID.
pub fn get_case(id: &str) -> Option<Box<dyn ClinicalCase>> {
    all_cases().into_iter().find(|c| c.id() == id)
}
