//! RiteBite Common Utilities
//!
//! Shared infrastructure for all RiteBite crates:
//! - Error types and result aliases
//! - Assembly and application configuration
//! - Render output naming
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use config::*;
pub use error::*;
pub use output::*;
