//! Models for the Weathergy server
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
