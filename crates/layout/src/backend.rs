//! Editing backend abstraction.
//!
//! A backend owns the real timeline (a video editor's sequencer, a render
//! graph, ...). The layout engine only ever talks to it through [`Backend`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::command::{AudioPlacement, ClipPlacement, ColorPlacement, ImagePlacement, TextPlacement};

/// Backend-assigned id of a strip on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StripId(pub u64);

/// Backend-assigned handle of a loaded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontHandle(pub u64);

/// Failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Read-only media queries, answered before anything is inserted.
pub trait MediaProbe {
    /// Frame rate of a media file, if the backend can tell.
    fn frame_rate(&self, _path: &Path) -> Option<f64> {
        None
    }
}

/// Operations the layout engine issues against an editing backend.
///
/// Inserts return the ids of the strips they created. A clip insert may
/// create more than one strip (picture plus linked sound).
pub trait Backend: MediaProbe {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Remove every strip from the timeline.
    fn clear(&mut self) -> BackendResult<()>;

    fn load_font(&mut self, path: &Path) -> BackendResult<FontHandle>;

    fn insert_clip(&mut self, clip: &ClipPlacement) -> BackendResult<Vec<StripId>>;

    fn insert_audio(&mut self, audio: &AudioPlacement) -> BackendResult<StripId>;

    fn insert_color(&mut self, color: &ColorPlacement) -> BackendResult<StripId>;

    fn insert_text(&mut self, text: &TextPlacement, font: FontHandle) -> BackendResult<StripId>;

    fn insert_image(&mut self, image: &ImagePlacement) -> BackendResult<StripId>;

    /// Combine strips into one meta strip.
    fn group(&mut self, strips: &[StripId]) -> BackendResult<StripId>;

    /// Set the exclusive end of the playback range.
    fn set_timeline_end(&mut self, frame: i64) -> BackendResult<()>;
}

/// A call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
    Clear,
    LoadFont {
        path: PathBuf,
        font: FontHandle,
    },
    InsertClip {
        clip: ClipPlacement,
        strips: Vec<StripId>,
    },
    InsertAudio {
        audio: AudioPlacement,
        strip: StripId,
    },
    InsertColor {
        color: ColorPlacement,
        strip: StripId,
    },
    InsertText {
        text: TextPlacement,
        font: FontHandle,
        strip: StripId,
    },
    InsertImage {
        image: ImagePlacement,
        strip: StripId,
    },
    Group {
        members: Vec<StripId>,
        strip: StripId,
    },
    SetTimelineEnd {
        frame: i64,
    },
}

/// Backend that records every call instead of editing anything.
///
/// Used by tests and by the CLI's dry run. Ids are handed out in call
/// order starting at 1.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    frame_rates: HashMap<PathBuf, f64>,
    linked_sound: bool,
    fail_on: Option<&'static str>,
    next_id: u64,
    timeline_end: Option<i64>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            frame_rates: HashMap::new(),
            linked_sound: true,
            fail_on: None,
            next_id: 1,
            timeline_end: None,
        }
    }

    /// Report `fps` as the frame rate of `path`.
    pub fn with_frame_rate(mut self, path: impl Into<PathBuf>, fps: f64) -> Self {
        self.frame_rates.insert(path.into(), fps);
        self
    }

    /// Whether clip inserts also create a sound strip. On by default.
    pub fn with_linked_sound(mut self, linked: bool) -> Self {
        self.linked_sound = linked;
        self
    }

    /// Fail every call to `operation` (e.g. `"insert_text"`).
    pub fn fail_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Last value passed to `set_timeline_end`, kept across clears.
    pub fn timeline_end(&self) -> Option<i64> {
        self.timeline_end
    }

    /// Calls since the most recent `clear`.
    pub fn calls_since_clear(&self) -> &[BackendCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| matches!(call, BackendCall::Clear))
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    fn check(&self, operation: &'static str) -> BackendResult<()> {
        match self.fail_on {
            Some(failing) if failing == operation => Err(BackendError::new(format!(
                "recording backend configured to fail on {operation}"
            ))),
            _ => Ok(()),
        }
    }

    fn next_strip(&mut self) -> StripId {
        let id = StripId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl MediaProbe for RecordingBackend {
    fn frame_rate(&self, path: &Path) -> Option<f64> {
        self.frame_rates.get(path).copied()
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn clear(&mut self) -> BackendResult<()> {
        self.check("clear")?;
        self.calls.push(BackendCall::Clear);
        Ok(())
    }

    fn load_font(&mut self, path: &Path) -> BackendResult<FontHandle> {
        self.check("load_font")?;
        let font = FontHandle(self.next_strip().0);
        self.calls.push(BackendCall::LoadFont {
            path: path.to_path_buf(),
            font,
        });
        Ok(font)
    }

    fn insert_clip(&mut self, clip: &ClipPlacement) -> BackendResult<Vec<StripId>> {
        self.check("insert_clip")?;
        let mut strips = vec![self.next_strip()];
        if self.linked_sound {
            strips.push(self.next_strip());
        }
        self.calls.push(BackendCall::InsertClip {
            clip: clip.clone(),
            strips: strips.clone(),
        });
        Ok(strips)
    }

    fn insert_audio(&mut self, audio: &AudioPlacement) -> BackendResult<StripId> {
        self.check("insert_audio")?;
        let strip = self.next_strip();
        self.calls.push(BackendCall::InsertAudio {
            audio: audio.clone(),
            strip,
        });
        Ok(strip)
    }

    fn insert_color(&mut self, color: &ColorPlacement) -> BackendResult<StripId> {
        self.check("insert_color")?;
        let strip = self.next_strip();
        self.calls.push(BackendCall::InsertColor {
            color: color.clone(),
            strip,
        });
        Ok(strip)
    }

    fn insert_text(&mut self, text: &TextPlacement, font: FontHandle) -> BackendResult<StripId> {
        self.check("insert_text")?;
        let strip = self.next_strip();
        self.calls.push(BackendCall::InsertText {
            text: text.clone(),
            font,
            strip,
        });
        Ok(strip)
    }

    fn insert_image(&mut self, image: &ImagePlacement) -> BackendResult<StripId> {
        self.check("insert_image")?;
        let strip = self.next_strip();
        self.calls.push(BackendCall::InsertImage {
            image: image.clone(),
            strip,
        });
        Ok(strip)
    }

    fn group(&mut self, strips: &[StripId]) -> BackendResult<StripId> {
        self.check("group")?;
        let strip = self.next_strip();
        self.calls.push(BackendCall::Group {
            members: strips.to_vec(),
            strip,
        });
        Ok(strip)
    }

    fn set_timeline_end(&mut self, frame: i64) -> BackendResult<()> {
        self.check("set_timeline_end")?;
        self.timeline_end = Some(frame);
        self.calls.push(BackendCall::SetTimelineEnd { frame });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FramePlacement;

    fn audio() -> AudioPlacement {
        AudioPlacement {
            file: PathBuf::from("/media/theme.mp3"),
            frames: FramePlacement {
                channel: 5,
                start: 1,
                duration: 300,
            },
            volume: 0.3,
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut backend = RecordingBackend::new();
        let first = backend.insert_audio(&audio()).unwrap();
        let second = backend.insert_audio(&audio()).unwrap();
        assert_eq!(first, StripId(1));
        assert_eq!(second, StripId(2));
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn test_frame_rate_probe() {
        let backend = RecordingBackend::new().with_frame_rate("/media/a.mp4", 25.0);
        assert_eq!(backend.frame_rate(Path::new("/media/a.mp4")), Some(25.0));
        assert_eq!(backend.frame_rate(Path::new("/media/b.mp4")), None);
    }

    #[test]
    fn test_configured_failure() {
        let mut backend = RecordingBackend::new().fail_on("insert_audio");
        let err = backend.insert_audio(&audio()).unwrap_err();
        assert!(err.message.contains("insert_audio"));
        assert!(backend.calls().is_empty());
        assert!(backend.set_timeline_end(10).is_ok());
        assert_eq!(backend.timeline_end(), Some(10));
    }

    #[test]
    fn test_calls_since_clear() {
        let mut backend = RecordingBackend::new();
        backend.insert_audio(&audio()).unwrap();
        backend.clear().unwrap();
        backend.set_timeline_end(5).unwrap();
        assert_eq!(
            backend.calls_since_clear(),
            &[BackendCall::SetTimelineEnd { frame: 5 }]
        );
    }
}
