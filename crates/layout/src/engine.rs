//! The layout planner.
//!
//! # Algorithm
//!
//! 1. **Clips** go end to end on the clip track. Each clip's `start..=end`
//!    is a trim window into its source: the source is inserted at
//!    `cursor - (start - 1)` so the first kept frame lands on the cursor.
//!    A clip flagged for transition starts one second (at the source frame
//!    rate) earlier and fades in over the overlap.
//! 2. **Group**: every placed clip is collected into one group command.
//! 3. **Absolute kinds** (sound, color, text, image, in that order) sit at
//!    their own `start` with duration `end - start + 1`.
//! 4. **Timeline end**: the largest exclusive end of anything placed.
//!
//! Planning never touches the backend except for read-only frame-rate
//! probes, so a plan can be inspected before anything is edited.

use std::path::Path;

use tracing::{debug, info, warn};

use ritebite_common::AssemblyConfig;
use ritebite_edit_script::{Canvas, ClipSegment, EditScript, Placed};

use crate::backend::MediaProbe;
use crate::command::{
    AudioPlacement, ClipPlacement, ColorPlacement, FadeIn, FramePlacement, ImagePlacement,
    PlacementCommand, TextPlacement, TimelinePlan,
};
use crate::error::{AssemblyError, AssemblyResult};
use crate::fonts::{DirectoryFontResolver, FontResolver};
use crate::state::TimelineState;

/// Resolves an [`EditScript`] into a [`TimelinePlan`].
#[derive(Debug, Clone)]
pub struct LayoutEngine<R = DirectoryFontResolver> {
    canvas: Canvas,
    default_frame_rate: f64,
    fonts: R,
}

impl LayoutEngine<DirectoryFontResolver> {
    /// Build an engine from validated assembly settings.
    pub fn from_config(config: &AssemblyConfig) -> AssemblyResult<Self> {
        config.validate()?;
        Ok(Self::new(
            Canvas::new(config.canvas_width, config.canvas_height),
            config.default_frame_rate,
            DirectoryFontResolver::new(&config.font_dir, config.font_extension.as_str()),
        ))
    }
}

impl<R: FontResolver> LayoutEngine<R> {
    pub fn new(canvas: Canvas, default_frame_rate: f64, fonts: R) -> Self {
        Self {
            canvas,
            default_frame_rate,
            fonts,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn default_frame_rate(&self) -> f64 {
        self.default_frame_rate
    }

    /// Plan every visible segment of `script`, advancing `state`.
    ///
    /// The returned plan ends with a [`PlacementCommand::SetTimelineEnd`]
    /// carrying `state.max_end_frame`.
    pub fn plan(
        &self,
        script: &EditScript,
        state: &mut TimelineState,
        probe: &dyn MediaProbe,
    ) -> AssemblyResult<TimelinePlan> {
        let mut commands = Vec::new();

        let mut members = Vec::new();
        for (index, clip) in visible(&script.clips) {
            let placement = self.place_clip(index, clip, state.cursor, probe)?;
            debug!(
                index,
                file = %placement.file.display(),
                strip_start = placement.strip_start,
                visible_start = placement.visible_start(),
                end = placement.end(),
                "Placed clip"
            );
            state.cursor = placement.end();
            state.extend_to(placement.end());
            members.push(commands.len());
            commands.push(PlacementCommand::InsertClip(placement));
        }
        if !members.is_empty() {
            commands.push(PlacementCommand::GroupClips { members });
        }

        for (index, audio) in visible(&script.audios) {
            let frames = absolute_frames(index, audio)?;
            state.extend_to(frames.end());
            commands.push(PlacementCommand::InsertAudio(AudioPlacement {
                file: audio.file.clone(),
                frames,
                volume: audio.volume,
            }));
        }

        for (index, color) in visible(&script.colors) {
            let frames = absolute_frames(index, color)?;
            state.extend_to(frames.end());
            commands.push(PlacementCommand::InsertColor(ColorPlacement {
                color: color.color.clone(),
                frames,
                offset: self.canvas.pixel_offset(color.position),
                scale: color.scale,
            }));
        }

        for (index, text) in visible(&script.texts) {
            let frames = absolute_frames(index, text)?;
            state.extend_to(frames.end());
            commands.push(PlacementCommand::InsertText(TextPlacement {
                text: text.text.clone(),
                frames,
                font_id: text.font.clone(),
                font_file: self.fonts.resolve(&text.font),
                size: text.size,
                location: text.position.flip_y(),
                color: text.color.clone(),
                shadow: text.shadow,
                boxed: text.boxed,
                box_color: text.box_color.clone(),
                bold: text.bold,
                italic: text.italic,
            }));
        }

        for (index, image) in visible(&script.images) {
            let frames = absolute_frames(index, image)?;
            state.extend_to(frames.end());
            commands.push(PlacementCommand::InsertImage(ImagePlacement {
                file: image.file.clone(),
                frames,
                offset: self.canvas.pixel_offset(image.position),
                scale: image.scale,
            }));
        }

        commands.push(PlacementCommand::SetTimelineEnd {
            frame: state.max_end_frame,
        });

        let plan = TimelinePlan {
            commands,
            cursor: state.cursor,
            max_end_frame: state.max_end_frame,
        };
        info!(
            commands = plan.len(),
            segments = plan.segment_count(),
            cursor = plan.cursor,
            max_end_frame = plan.max_end_frame,
            "Timeline planned"
        );
        Ok(plan)
    }

    fn place_clip(
        &self,
        index: usize,
        clip: &ClipSegment,
        cursor: i64,
        probe: &dyn MediaProbe,
    ) -> AssemblyResult<ClipPlacement> {
        let range = checked_range(index, clip)?;
        if range.start < 1 {
            return Err(AssemblyError::InvalidClipStart {
                index,
                start: range.start,
            });
        }

        let count = frame_count(index, clip)?;
        let offset = range.start - 1;
        let overlap = if clip.transition {
            self.transition_overlap(&clip.file, count, cursor, probe)
        } else {
            0
        };
        let visible_start = cursor - overlap;
        // `end()` is computed from these fields later, so it must fit here.
        visible_start
            .checked_add(count)
            .ok_or_else(|| overflow::<ClipSegment>(index))?;

        Ok(ClipPlacement {
            file: clip.file.clone(),
            channel: clip.channel,
            strip_start: visible_start - offset,
            trim_offset: offset,
            duration: count,
            volume: clip.volume,
            fade_in: (overlap > 0).then_some(FadeIn { frames: overlap }),
        })
    }

    /// One second of the clip's source, clamped to the clip itself and to
    /// the frames already on the track.
    fn transition_overlap(
        &self,
        file: &Path,
        count: i64,
        cursor: i64,
        probe: &dyn MediaProbe,
    ) -> i64 {
        let fps = match probe.frame_rate(file) {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => {
                warn!(
                    file = %file.display(),
                    fallback = self.default_frame_rate,
                    "Frame rate unavailable, using default"
                );
                self.default_frame_rate
            }
        };
        (fps.round() as i64).min(count).min(cursor).max(0)
    }
}

fn visible<T: Placed>(items: &[T]) -> impl Iterator<Item = (usize, &T)> {
    items.iter().enumerate().filter(|(_, item)| item.show())
}

fn checked_range<T: Placed>(
    index: usize,
    segment: &T,
) -> AssemblyResult<ritebite_edit_script::FrameRange> {
    let range = segment.range();
    if range.is_valid() {
        Ok(range)
    } else {
        Err(AssemblyError::InvalidFrameRange {
            kind: T::KIND,
            index,
            start: range.start,
            end: range.end,
        })
    }
}

/// Inclusive frame count, rejecting ranges too wide for `i64`.
fn frame_count<T: Placed>(index: usize, segment: &T) -> AssemblyResult<i64> {
    let range = checked_range(index, segment)?;
    range
        .end
        .checked_sub(range.start)
        .and_then(|span| span.checked_add(1))
        .ok_or_else(|| overflow::<T>(index))
}

fn overflow<T: Placed>(index: usize) -> AssemblyError {
    AssemblyError::FrameOverflow {
        kind: T::KIND,
        index,
    }
}

fn absolute_frames<T: Placed>(index: usize, segment: &T) -> AssemblyResult<FramePlacement> {
    let duration = frame_count(index, segment)?;
    let start = segment.range().start;
    start
        .checked_add(duration)
        .ok_or_else(|| overflow::<T>(index))?;
    Ok(FramePlacement {
        channel: segment.channel(),
        start,
        duration,
    })
}
