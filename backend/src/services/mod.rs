//! Business logic services for the Weathergy server

pub mod sensor;
pub mod weather;

pub use sensor::SensorSource;
pub use weather::WeatherService;
