//! osce-core
//!
//! Pure domain types for OSCE practice sessions: phases, messages, vitals,
//! checklists, evaluation inputs and the directory records shared by the
//! engine and the HTTP service. No I/O.

pub mod error;
pub mod models;
