//! Resolved placement commands.
//!
//! A [`TimelinePlan`] is everything the backend needs, with all frame math
//! already done. Frames here are timeline frames; every `end` is exclusive.

use std::path::PathBuf;

use serde::Serialize;

use ritebite_edit_script::{HexColor, NormalizedPoint, PixelOffset, Scale};

/// Where a segment sits on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FramePlacement {
    pub channel: u32,
    pub start: i64,
    pub duration: i64,
}

impl FramePlacement {
    /// First frame after the segment.
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }
}

/// A fade from silence/black into the strip, starting at its visible start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FadeIn {
    pub frames: i64,
}

/// A movie clip, trimmed and positioned on the clip track.
///
/// The backend inserts the whole source at `strip_start` and trims
/// `trim_offset` frames off the front, so the visible part begins at
/// `strip_start + trim_offset` and lasts `duration` frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipPlacement {
    pub file: PathBuf,
    pub channel: u32,
    pub strip_start: i64,
    pub trim_offset: i64,
    pub duration: i64,
    pub volume: f64,
    pub fade_in: Option<FadeIn>,
}

impl ClipPlacement {
    pub fn visible_start(&self) -> i64 {
        self.strip_start + self.trim_offset
    }

    pub fn end(&self) -> i64 {
        self.visible_start() + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioPlacement {
    pub file: PathBuf,
    pub frames: FramePlacement,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPlacement {
    pub color: HexColor,
    pub frames: FramePlacement,
    pub offset: PixelOffset,
    pub scale: Scale,
}

/// A caption. `location` has y measured from the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPlacement {
    pub text: String,
    pub frames: FramePlacement,
    pub font_id: String,
    pub font_file: PathBuf,
    pub size: f64,
    pub location: NormalizedPoint,
    pub color: HexColor,
    pub shadow: bool,
    pub boxed: bool,
    pub box_color: HexColor,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub file: PathBuf,
    pub frames: FramePlacement,
    pub offset: PixelOffset,
    pub scale: Scale,
}

/// One backend operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlacementCommand {
    InsertClip(ClipPlacement),
    /// Group the strips created by earlier commands, by position in the plan.
    GroupClips { members: Vec<usize> },
    InsertAudio(AudioPlacement),
    InsertColor(ColorPlacement),
    InsertText(TextPlacement),
    InsertImage(ImagePlacement),
    SetTimelineEnd { frame: i64 },
}

impl PlacementCommand {
    /// Backend operation name, as used in logs and errors.
    pub fn operation(&self) -> &'static str {
        match self {
            PlacementCommand::InsertClip(_) => "insert_clip",
            PlacementCommand::GroupClips { .. } => "group",
            PlacementCommand::InsertAudio(_) => "insert_audio",
            PlacementCommand::InsertColor(_) => "insert_color",
            PlacementCommand::InsertText(_) => "insert_text",
            PlacementCommand::InsertImage(_) => "insert_image",
            PlacementCommand::SetTimelineEnd { .. } => "set_timeline_end",
        }
    }

    /// Exclusive end frame of an inserted segment.
    pub fn end_frame(&self) -> Option<i64> {
        match self {
            PlacementCommand::InsertClip(c) => Some(c.end()),
            PlacementCommand::InsertAudio(a) => Some(a.frames.end()),
            PlacementCommand::InsertColor(c) => Some(c.frames.end()),
            PlacementCommand::InsertText(t) => Some(t.frames.end()),
            PlacementCommand::InsertImage(i) => Some(i.frames.end()),
            PlacementCommand::GroupClips { .. } | PlacementCommand::SetTimelineEnd { .. } => None,
        }
    }
}

/// Ordered backend commands for one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelinePlan {
    pub commands: Vec<PlacementCommand>,
    /// Clip cursor after the last clip.
    pub cursor: i64,
    /// Exclusive end of the whole timeline.
    pub max_end_frame: i64,
}

impl TimelinePlan {
    pub fn clips(&self) -> impl Iterator<Item = &ClipPlacement> {
        self.commands.iter().filter_map(|command| match command {
            PlacementCommand::InsertClip(clip) => Some(clip),
            _ => None,
        })
    }

    /// Number of segment inserts, all kinds.
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| command.end_frame().is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(strip_start: i64, trim_offset: i64, duration: i64) -> ClipPlacement {
        ClipPlacement {
            file: PathBuf::from("/media/a.mp4"),
            channel: 1,
            strip_start,
            trim_offset,
            duration,
            volume: 1.0,
            fade_in: None,
        }
    }

    #[test]
    fn test_clip_visible_window() {
        let placement = clip(-9, 9, 10);
        assert_eq!(placement.visible_start(), 0);
        assert_eq!(placement.end(), 10);
    }

    #[test]
    fn test_plan_counts() {
        let plan = TimelinePlan {
            commands: vec![
                PlacementCommand::InsertClip(clip(0, 0, 50)),
                PlacementCommand::GroupClips { members: vec![0] },
                PlacementCommand::SetTimelineEnd { frame: 50 },
            ],
            cursor: 50,
            max_end_frame: 50,
        };
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.segment_count(), 1);
        assert_eq!(plan.clips().count(), 1);
        assert_eq!(plan.commands[1].operation(), "group");
    }

    #[test]
    fn test_commands_serialize_with_op_tag() {
        let json = serde_json::to_value(PlacementCommand::SetTimelineEnd { frame: 42 }).unwrap();
        assert_eq!(json["op"], "set_timeline_end");
        assert_eq!(json["frame"], 42);
    }
}
