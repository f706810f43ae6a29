//! HTTP handlers for the AuraCast prediction service

pub mod health;
pub mod predict;

pub use health::{health_check, root};
pub use predict::predict;
