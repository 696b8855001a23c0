//! Typed segments decoded from edit-script rows.
//!
//! Every segment carries an inclusive frame range, a channel (track index
//! starting at 1) and a `show` flag. Hidden segments are parsed but never
//! placed.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::geometry::{NormalizedPoint, Scale};

/// Section keywords and the segment kind each introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Clip,
    Text,
    Image,
    Color,
    Sound,
}

impl SectionKind {
    /// All kinds, in keyword-table order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Clip,
        SectionKind::Text,
        SectionKind::Image,
        SectionKind::Color,
        SectionKind::Sound,
    ];

    /// Keyword that starts a section of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            SectionKind::Clip => "clip",
            SectionKind::Text => "text",
            SectionKind::Image => "image",
            SectionKind::Color => "color",
            SectionKind::Sound => "sound",
        }
    }

    /// Match a keyword cell. Surrounding whitespace is ignored.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Column names of a data row, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            SectionKind::Clip => &["file", "start", "end", "sound", "effect", "channel", "show"],
            SectionKind::Text => &[
                "text", "start", "end", "font", "size", "x", "y", "color", "shadow", "box",
                "box_color", "bold", "italic", "channel", "show",
            ],
            SectionKind::Image => &[
                "file", "start", "end", "x", "y", "scale_x", "scale_y", "channel", "show",
            ],
            SectionKind::Color => &[
                "color", "start", "end", "x", "y", "scale_x", "scale_y", "channel", "show",
            ],
            SectionKind::Sound => &["file", "start", "end", "volume", "channel", "show"],
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Inclusive range of frames, `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Number of frames covered, counting both ends.
    pub fn frame_count(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Whether the invariant `end >= start` holds.
    ///
    /// Fields are public, so ranges built by hand can break it.
    pub fn is_valid(&self) -> bool {
        self.end >= self.start
    }
}

/// Shared capability of all segment variants.
pub trait Placed {
    /// Kind of section the segment came from.
    const KIND: SectionKind;

    /// Inclusive frame range from the row.
    fn range(&self) -> FrameRange;

    /// Track index, starting at 1.
    fn channel(&self) -> u32;

    /// Whether the segment takes part in layout.
    fn show(&self) -> bool;
}

/// A movie clip placed sequentially on the clip track.
///
/// `range` is a trim window into the source media, not a timeline position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSegment {
    /// Media file, resolved against the media directory.
    pub file: PathBuf,
    pub range: FrameRange,
    /// Volume of the clip's own sound, `0.0..=1.0`.
    pub volume: f64,
    /// Crossfade into this clip from the previous one.
    pub transition: bool,
    pub channel: u32,
    pub show: bool,
}

/// A caption placed at an absolute frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Caption text. Group delimiters are already replaced by line breaks.
    pub text: String,
    pub range: FrameRange,
    /// Font id, resolved to a file by the layout engine.
    pub font: String,
    pub size: f64,
    /// Position with y measured from the top, as written in the script.
    pub position: NormalizedPoint,
    pub color: HexColor,
    pub shadow: bool,
    /// Draw a background box behind the text.
    pub boxed: bool,
    pub box_color: HexColor,
    pub bold: bool,
    pub italic: bool,
    pub channel: u32,
    /// Multi-line caption built from a delimited text cell.
    pub group: bool,
    pub show: bool,
}

/// A still image placed at an absolute frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSegment {
    pub file: PathBuf,
    pub range: FrameRange,
    pub position: NormalizedPoint,
    pub scale: Scale,
    pub channel: u32,
    pub show: bool,
}

/// A solid color overlay placed at an absolute frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSegment {
    pub color: HexColor,
    pub range: FrameRange,
    pub position: NormalizedPoint,
    pub scale: Scale,
    pub channel: u32,
    pub show: bool,
}

/// A sound cue placed at an absolute frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    pub file: PathBuf,
    pub range: FrameRange,
    pub volume: f64,
    pub channel: u32,
    pub show: bool,
}

macro_rules! impl_placed {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Placed for $ty {
                const KIND: SectionKind = $kind;

                fn range(&self) -> FrameRange {
                    self.range
                }

                fn channel(&self) -> u32 {
                    self.channel
                }

                fn show(&self) -> bool {
                    self.show
                }
            }
        )*
    };
}

impl_placed! {
    ClipSegment => SectionKind::Clip,
    TextSegment => SectionKind::Text,
    ImageSegment => SectionKind::Image,
    ColorSegment => SectionKind::Color,
    AudioSegment => SectionKind::Sound,
}

/// Any decoded segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Clip(ClipSegment),
    Text(TextSegment),
    Image(ImageSegment),
    Color(ColorSegment),
    Sound(AudioSegment),
}

impl Segment {
    pub fn kind(&self) -> SectionKind {
        match self {
            Segment::Clip(_) => SectionKind::Clip,
            Segment::Text(_) => SectionKind::Text,
            Segment::Image(_) => SectionKind::Image,
            Segment::Color(_) => SectionKind::Color,
            Segment::Sound(_) => SectionKind::Sound,
        }
    }

    pub fn range(&self) -> FrameRange {
        match self {
            Segment::Clip(s) => s.range,
            Segment::Text(s) => s.range,
            Segment::Image(s) => s.range,
            Segment::Color(s) => s.range,
            Segment::Sound(s) => s.range,
        }
    }

    pub fn channel(&self) -> u32 {
        match self {
            Segment::Clip(s) => s.channel,
            Segment::Text(s) => s.channel,
            Segment::Image(s) => s.channel,
            Segment::Color(s) => s.channel,
            Segment::Sound(s) => s.channel,
        }
    }

    pub fn show(&self) -> bool {
        match self {
            Segment::Clip(s) => s.show,
            Segment::Text(s) => s.show,
            Segment::Image(s) => s.show,
            Segment::Color(s) => s.show,
            Segment::Sound(s) => s.show,
        }
    }
}

/// Parsed edit script: one collection per kind, in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    pub clips: Vec<ClipSegment>,
    pub texts: Vec<TextSegment>,
    pub images: Vec<ImageSegment>,
    pub colors: Vec<ColorSegment>,
    pub audios: Vec<AudioSegment>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded segment to its kind's collection.
    pub fn push(&mut self, segment: Segment) {
        match segment {
            Segment::Clip(s) => self.clips.push(s),
            Segment::Text(s) => self.texts.push(s),
            Segment::Image(s) => self.images.push(s),
            Segment::Color(s) => self.colors.push(s),
            Segment::Sound(s) => self.audios.push(s),
        }
    }

    /// Number of segments of one kind, hidden ones included.
    pub fn count(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::Clip => self.clips.len(),
            SectionKind::Text => self.texts.len(),
            SectionKind::Image => self.images.len(),
            SectionKind::Color => self.colors.len(),
            SectionKind::Sound => self.audios.len(),
        }
    }

    /// Number of visible segments of one kind.
    pub fn visible_count(&self, kind: SectionKind) -> usize {
        fn visible<T: Placed>(items: &[T]) -> usize {
            items.iter().filter(|s| s.show()).count()
        }
        match kind {
            SectionKind::Clip => visible(&self.clips),
            SectionKind::Text => visible(&self.texts),
            SectionKind::Image => visible(&self.images),
            SectionKind::Color => visible(&self.colors),
            SectionKind::Sound => visible(&self.audios),
        }
    }

    /// Total number of segments, hidden ones included.
    pub fn len(&self) -> usize {
        SectionKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
