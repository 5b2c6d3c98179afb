use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Simulated patient vital signs shown on the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vitals {
    pub age: u32,
    pub weight_kg: f32,
    pub temperature_c: f32,
    pub heart_rate_bpm: u32,
    pub spo2: u8,
    pub respiratory_rate: u8,
}

impl Vitals {
    /// Readings every session starts from.
    pub const BASELINE: Vitals = Vitals {
        age: 45,
        weight_kg: 70.0,
        temperature_c: 38.2,
        heart_rate_bpm: 92,
        spo2: 95,
        respiratory_rate: 18,
    };

    pub const DETERIORATED_SPO2: u8 = 88;
    pub const DETERIORATED_RESPIRATORY_RATE: u8 = 28;
    pub const DETERIORATED_HEART_RATE_BPM: u32 = 102;

    /// Apply the scripted deterioration readings. Age, weight and
    /// temperature are left as they were.
    pub fn deteriorate(&mut self) {
        self.spo2 = Self::DETERIORATED_SPO2;
        self.respiratory_rate = Self::DETERIORATED_RESPIRATORY_RATE;
        self.heart_rate_bpm = Self::DETERIORATED_HEART_RATE_BPM;
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::BASELINE
    }
}
