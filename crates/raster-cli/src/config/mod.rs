//! Configuration management: defaults, validation, loading from environment.

pub mod raster_config;
pub mod validation;

pub use raster_config::RasterConfig;
