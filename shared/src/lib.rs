//! Shared types and models for the AuraCast climatology platform
//!
//! This crate contains types shared between the offline training pipeline
//! and the online inference backend.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
