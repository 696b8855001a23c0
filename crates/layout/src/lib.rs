//! RiteBite Layout Engine
//!
//! Turns a parsed edit script into a fully resolved timeline and drives an
//! editing backend with it.
//!
//! # Pipeline
//!
//! 1. **Plan:** clips are laid end to end from a running cursor (with
//!    optional crossfade overlaps), then sound, color, text and image
//!    segments are placed at their absolute frames. The result is a plain
//!    list of [`PlacementCommand`]s plus the derived timeline end.
//! 2. **Execute:** commands are replayed against a [`Backend`] in order.
//!    Each insert returns the ids of the strips it created, which later
//!    commands (the clip group) refer to.
//!
//! Everything runs on one thread; a [`TimelineState`] belongs to a single
//! assembly run.

pub mod assembly;
pub mod backend;
pub mod command;
pub mod engine;
pub mod error;
pub mod fonts;
pub mod state;

pub use assembly::*;
pub use backend::*;
pub use command::*;
pub use engine::*;
pub use error::*;
pub use fonts::*;
pub use state::*;
