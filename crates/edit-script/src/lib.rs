//! RiteBite Edit Script
//!
//! Defines the data contracts between a tabular edit script and the
//! layout engine:
//! - **Rows:** Raw cells as they come out of a spreadsheet or CSV reader
//! - **Segments:** Typed clip, text, image, color and sound entries
//! - **Parser:** Section splitting and strict per-kind row decoding
//! - **Geometry / Color:** Normalized-to-pixel and hex-to-channel conversion
//!
//! Positions in the script are normalized to `[0.0, 1.0]` relative to the
//! canvas; frame ranges are inclusive on both ends.

pub mod color;
pub mod error;
pub mod geometry;
pub mod parser;
pub mod row;
pub mod segment;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use parser::*;
pub use row::*;
pub use segment::*;
