//! osce-practice
//!
//! The practice-session engine: phase state machine, virtual timers,
//! deterioration, patient conversation, physical exam and scoring.
//! Synchronous and single-owner; the caller drives the clock.

pub mod conversation;
pub mod error;
pub mod exam;
pub mod history;
pub mod phase;
pub mod scoring;
pub mod session;
pub mod timer;
