pub mod appendicitis;
pub mod asthma;
pub mod myocardial_infarction;
pub mod pneumonia;
