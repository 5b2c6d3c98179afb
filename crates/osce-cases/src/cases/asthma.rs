use osce_core::models::case::CaseCategory;
use osce_core::models::zone::OrganSystem;

use crate::ClinicalCase;

/// Acute severe asthma exacerbation after a viral illness.
pub struct AcuteAsthma;

impl ClinicalCase for AcuteAsthma {
    fn id(&self) -> &str {
        "asthma"
    }

    fn title(&self) -> &str {
        "Acute Asthma Exacerbation"
    }

    fn category(&self) -> CaseCategory {
        CaseCategory::Respiratory
    }

    fn symptoms(&self) -> &[&'static str] {
        &[
            "Wheeze and chest tightness since last night",
            "Unable to finish sentences",
            "Reliever inhaler not helping",
        ]
    }

    fn replies(&self) -> &[&'static str] {
        &[
            "My chest... feels really tight.",
            "I've used my blue inhaler... loads of times... it's not working.",
            "I had a cold... last week.",
            "I was in hospital... with my asthma... two years ago.",
            "I'm allergic... to penicillin.",
        ]
    }

    fn findings(&self) -> &[(OrganSystem, &'static str)] {
        &[
            (
                OrganSystem::Respiratory,
                "Widespread polyphonic expiratory wheeze, reduced air entry bilaterally",
            ),
            (OrganSystem::Cardiovascular, "Tachycardic, heart sounds normal"),
            (OrganSystem::HeadNeck, "Use of accessory muscles, no stridor"),
        ]
    }
}
