pub mod cases;
pub mod evaluation;
pub mod health;
pub mod sessions;
pub mod stations;
