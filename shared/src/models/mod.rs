//! Domain models for the AuraCast climatology platform

pub mod bins;
pub mod features;
pub mod labels;
pub mod prediction;
pub mod record;

pub use bins::*;
pub use features::*;
pub use labels::*;
pub use prediction::*;
pub use record::*;
