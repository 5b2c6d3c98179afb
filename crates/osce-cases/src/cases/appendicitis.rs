use osce_core::models::case::CaseCategory;
use osce_core::models::zone::OrganSystem;

use crate::ClinicalCase;

/// Acute appendicitis with pain migrating to the right iliac fossa.
pub struct Appendicitis;

impl ClinicalCase for Appendicitis {
    fn id(&self) -> &str {
        "appendicitis"
    }

    fn title(&self) -> &str {
        "Acute Appendicitis"
    }

    fn category(&self) -> CaseCategory {
        CaseCategory::Gastrointestinal
    }

    fn symptoms(&self) -> &[&'static str] {
        &[
            "Abdominal pain that started around the belly button",
            "Pain now in the lower right abdomen",
            "Loss of appetite and one episode of vomiting",
        ]
    }

    fn replies(&self) -> &[&'static str] {
        &[
            "The pain started around my belly button yesterday evening.",
            "Now it's down here on the right and it's much sharper.",
            "It hurts more when I cough or the car goes over a bump.",
            "I haven't wanted to eat anything and I was sick once this morning.",
            "I've never had an operation before.",
        ]
    }

    fn findings(&self) -> &[(OrganSystem, &'static str)] {
        &[
            (
                OrganSystem::Abdominal,
                "Tender in the right iliac fossa with guarding; positive Rovsing's sign",
            ),
            (OrganSystem::Cardiovascular, "Mildly tachycardic, heart sounds normal"),
            (OrganSystem::Respiratory, "Chest clear"),
        ]
    }
}
