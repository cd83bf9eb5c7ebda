//! Vane - Streaming price-prediction and auto-trade decision engine

pub mod config;
pub mod error;
pub mod execution;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VaneError};
pub use services::{ConfigCommand, Engine, EngineEvent};
pub use types::*;
