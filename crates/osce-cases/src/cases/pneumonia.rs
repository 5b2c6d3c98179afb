use osce_core::models::case::CaseCategory;
use osce_core::models::zone::OrganSystem;

use crate::ClinicalCase;

/// Community-acquired pneumonia, right lower lobe.
/// Deteriorates into hypoxia if the red flag is missed.
pub struct Pneumonia;

impl ClinicalCase for Pneumonia {
    fn id(&self) -> &str {
        "pneumonia"
    }

    fn title(&self) -> &str {
        "Community-Acquired Pneumonia"
    }

    fn category(&self) -> CaseCategory {
        CaseCategory::Respiratory
    }

    fn symptoms(&self) -> &[&'static str] {
        &[
            "Productive cough with yellow-green sputum",
            "Fever and chills for three days",
            "Right-sided chest pain worse on deep breathing",
            "Shortness of breath on exertion",
        ]
    }

    fn replies(&self) -> &[&'static str] {
        &[
            "It started about three days ago with a cough, and now I'm bringing up green phlegm.",
            "I've had fevers and shivers, especially at night.",
            "It hurts on the right side of my chest when I take a deep breath.",
            "I get out of breath just walking to the bathroom.",
            "I don't have any other medical problems, and I'm not on any regular medication.",
            "No allergies that I know of.",
        ]
    }

    fn findings(&self) -> &[(OrganSystem, &'static str)] {
        &[
            (
                OrganSystem::Respiratory,
                "Coarse crackles and bronchial breathing over the right lower zone",
            ),
            (
                OrganSystem::Cardiovascular,
                "Tachycardic, regular rhythm, heart sounds I + II, no murmurs",
            ),
            (OrganSystem::HeadNeck, "No lymphadenopathy, trachea central"),
            (OrganSystem::Abdominal, "Soft, non-tender, no organomegaly"),
            (OrganSystem::Extremities, "Warm peripheries, no oedema"),
        ]
    }
}
