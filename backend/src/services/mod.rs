//! Core pipeline services for the AuraCast platform

pub mod artifacts;
pub mod binning;
pub mod dataset;
pub mod features;
pub mod predictor;
pub mod training;
