use osce_core::models::case::CaseCategory;
use osce_core::models::zone::OrganSystem;

use crate::ClinicalCase;

/// Acute inferior STEMI presenting as crushing central chest pain.
pub struct MyocardialInfarction;

impl ClinicalCase for MyocardialInfarction {
    fn id(&self) -> &str {
        "myocardial_infarction"
    }

    fn title(&self) -> &str {
        "Acute Myocardial Infarction"
    }

    fn category(&self) -> CaseCategory {
        CaseCategory::Cardiovascular
    }

    fn symptoms(&self) -> &[&'static str] {
        &[
            "Crushing central chest pain for 40 minutes",
            "Pain radiating to the left arm and jaw",
            "Sweating and nausea",
        ]
    }

    fn replies(&self) -> &[&'static str] {
        &[
            "It feels like an elephant is sitting on my chest.",
            "It came on about forty minutes ago while I was climbing the stairs.",
            "The pain goes down my left arm and up into my jaw.",
            "I feel sick and I'm sweating a lot.",
            "I have high blood pressure and I smoke about twenty a day.",
            "I take a tablet for my blood pressure, I can't remember the name.",
        ]
    }

    fn findings(&self) -> &[(OrganSystem, &'static str)] {
        &[
            (
                OrganSystem::Cardiovascular,
                "Heart sounds I + II with a soft fourth heart sound, no murmurs",
            ),
            (OrganSystem::Respiratory, "Vesicular breath sounds, no added sounds"),
            (OrganSystem::HeadNeck, "JVP not raised"),
            (OrganSystem::Extremities, "Cool, clammy peripheries; pulses present"),
        ]
    }
}
