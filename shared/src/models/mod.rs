//! Domain models for the Weathergy platform

mod condition;
mod prediction;
mod series;

pub use condition::*;
pub use prediction::*;
pub use series::*;
