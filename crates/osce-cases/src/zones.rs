//! Body zones on the manikin diagram and the organ system each examines.

use std::sync::LazyLock;

use osce_core::models::zone::{BodyZone, OrganSystem};

static ZONES: LazyLock<Vec<BodyZone>> = LazyLock::new(|| {
    [
        ("head", "Head", OrganSystem::Neurological),
        ("neck", "Neck", OrganSystem::HeadNeck),
        ("chest_left", "Left Chest", OrganSystem::Respiratory),
        ("chest_right", "Right Chest", OrganSystem::Respiratory),
        ("back", "Back", OrganSystem::Respiratory),
        ("precordium", "Precordium", OrganSystem::Cardiovascular),
        ("abdomen_upper", "Upper Abdomen", OrganSystem::Abdominal),
        ("abdomen_lower_right", "Right Iliac Fossa", OrganSystem::Abdominal),
        ("abdomen_lower_left", "Left Iliac Fossa", OrganSystem::Abdominal),
        ("arms", "Arms", OrganSystem::Extremities),
        ("legs", "Legs", OrganSystem::Extremities),
    ]
    .into_iter()
    .map(|(id, label, organ_system)| BodyZone {
        id: id.to_string(),
        label: label.to_string(),
        organ_system,
    })
    .collect()
});

pub fn all_zones() -> &'static [BodyZone] {
    &ZONES
}

pub fn get_zone(id: &str) -> Option<&'static BodyZone> {
    ZONES.iter().find(|z| z.id == id)
}
