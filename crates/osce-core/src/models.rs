pub mod case;
pub mod evaluation;
pub mod exam;
pub mod message;
pub mod phase;
pub mod session;
pub mod vitals;
pub mod zone;
