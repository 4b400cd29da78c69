//! Shared types and core logic for the Weathergy platform
//!
//! This crate holds the pure parts of the system: condition inference from
//! sensor readings, reshaping of forecast series into rows, and CSV
//! projection. It is used by the backend and, through WASM, by the browser.

pub mod error;
pub mod export;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use export::*;
pub use models::*;
pub use types::*;
pub use validation::*;
