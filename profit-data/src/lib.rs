//! Input adapters for the profit calculator: CSV sales files and TOML
//! configuration.

pub mod config;
pub mod loader;

pub use config::{AppConfig, ConfigError, FeeProfile};
pub use loader::{CsvLoadError, SaleCsvLoader};
