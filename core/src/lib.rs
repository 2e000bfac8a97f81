//! Kiln Core - Foundational Types
//!
//! This crate provides the foundational types used across the Kiln
//! packaging pipeline: the error taxonomy and the pipeline
//! configuration.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::KilnConfig;
pub use error::{KilnError, Result};

/// Kiln version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
