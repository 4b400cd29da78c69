//! HTTP handlers for the Weathergy API

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::{
    export_forecast_csv, export_series_csv, get_forecast, get_prediction, infer_conditions,
    reshape_series,
};
