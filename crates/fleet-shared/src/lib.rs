//! # Fleet Shared
//! 
//! Configuration, telemetry, shared types and constants for the fleet admin toolkit.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use config::AppConfig;
pub use error::AppError;
