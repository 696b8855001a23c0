//! Mutable state of one assembly run.

use serde::Serialize;

use crate::fonts::FontCache;

/// Running cursor, timeline end and loaded fonts.
///
/// `cursor` is where the next clip starts on the clip track. It only moves
/// forward while clips are placed. `max_end_frame` is the largest exclusive
/// end of anything placed so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimelineState {
    pub cursor: i64,
    pub max_end_frame: i64,
    #[serde(skip)]
    pub fonts: FontCache,
}

impl TimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial values. Loaded fonts are forgotten too.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Extend the timeline end to cover `end`, never shrinking it.
    pub fn extend_to(&mut self, end: i64) {
        self.max_end_frame = self.max_end_frame.max(end);
    }
}
