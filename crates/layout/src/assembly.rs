//! Assembly operations: clear, clear-all and rebuild.
//!
//! These are the entry points a host (editor add-on, CLI) calls. They pair
//! the planner with a [`Backend`] and own the order of side effects.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use ritebite_common::AssemblyConfig;
use ritebite_edit_script::{parse_rows, EditScript, Row};

use crate::backend::{Backend, StripId};
use crate::command::{PlacementCommand, TimelinePlan};
use crate::engine::LayoutEngine;
use crate::error::{AssemblyError, AssemblyResult};
use crate::fonts::FontResolver;
use crate::state::TimelineState;

/// Summary of one executed plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssemblyReport {
    /// Backend calls made for the plan, font loads excluded.
    pub commands_issued: usize,
    pub clips_placed: usize,
    /// Inserted segments of every kind, clips included.
    pub segments_placed: usize,
    pub max_end_frame: i64,
    pub cursor: i64,
    /// Group strip created for the clips, if any.
    pub clip_group: Option<StripId>,
}

/// Remove every strip and reset `state`.
pub fn clear<B: Backend + ?Sized>(backend: &mut B, state: &mut TimelineState) -> AssemblyResult<()> {
    backend
        .clear()
        .map_err(|e| AssemblyError::backend("clear", e))?;
    state.reset();
    info!(backend = backend.name(), "Timeline cleared");
    Ok(())
}

/// [`clear`], then delete the backend's proxy cache under the media dir.
///
/// Returns whether a proxy directory was removed.
pub fn clear_all<B: Backend + ?Sized>(
    backend: &mut B,
    state: &mut TimelineState,
    config: &AssemblyConfig,
) -> AssemblyResult<bool> {
    clear(backend, state)?;
    remove_proxy_cache(&config.proxy_dir())
}

/// Delete a proxy cache directory if it exists.
pub fn remove_proxy_cache(dir: &Path) -> AssemblyResult<bool> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "No proxy cache to remove");
        return Ok(false);
    }

    std::fs::remove_dir_all(dir).map_err(|source| AssemblyError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(path = %dir.display(), "Removed proxy cache");
    Ok(true)
}

/// Replay a plan against the backend, in order.
///
/// The first failing call aborts the rest of the plan. Strips inserted
/// before the failure stay on the timeline; clear before retrying.
pub fn execute<B: Backend + ?Sized>(
    plan: &TimelinePlan,
    backend: &mut B,
    state: &mut TimelineState,
) -> AssemblyResult<AssemblyReport> {
    let mut created: Vec<Vec<StripId>> = Vec::with_capacity(plan.len());
    let mut report = AssemblyReport {
        max_end_frame: plan.max_end_frame,
        cursor: plan.cursor,
        ..AssemblyReport::default()
    };

    for command in &plan.commands {
        let operation = command.operation();
        let fail = |e| AssemblyError::backend(operation, e);

        let strips = match command {
            PlacementCommand::InsertClip(clip) => {
                report.clips_placed += 1;
                backend.insert_clip(clip).map_err(fail)?
            }
            PlacementCommand::GroupClips { members } => {
                let strips: Vec<StripId> = members
                    .iter()
                    .filter_map(|&member| created.get(member))
                    .flatten()
                    .copied()
                    .collect();
                let group = backend.group(&strips).map_err(fail)?;
                report.clip_group = Some(group);
                vec![group]
            }
            PlacementCommand::InsertAudio(audio) => vec![backend.insert_audio(audio).map_err(fail)?],
            PlacementCommand::InsertColor(color) => vec![backend.insert_color(color).map_err(fail)?],
            PlacementCommand::InsertText(text) => {
                let font = state
                    .fonts
                    .get_or_load(&text.font_id, &text.font_file, backend)
                    .map_err(|e| AssemblyError::backend("load_font", e))?;
                vec![backend.insert_text(text, font).map_err(fail)?]
            }
            PlacementCommand::InsertImage(image) => vec![backend.insert_image(image).map_err(fail)?],
            PlacementCommand::SetTimelineEnd { frame } => {
                backend.set_timeline_end(*frame).map_err(fail)?;
                Vec::new()
            }
        };

        if command.end_frame().is_some() {
            report.segments_placed += 1;
        }
        report.commands_issued += 1;
        created.push(strips);
    }

    info!(
        backend = backend.name(),
        commands = report.commands_issued,
        segments = report.segments_placed,
        max_end_frame = report.max_end_frame,
        "Timeline assembled"
    );
    Ok(report)
}

/// Clear the backend, plan `script` from a fresh state and execute it.
pub fn rebuild<B: Backend, R: FontResolver>(
    backend: &mut B,
    state: &mut TimelineState,
    engine: &LayoutEngine<R>,
    script: &EditScript,
) -> AssemblyResult<AssemblyReport> {
    clear(backend, state)?;
    let plan = engine.plan(script, state, &*backend)?;
    execute(&plan, backend, state)
}

/// Parse raw rows with `config.media_dir` and rebuild the timeline from them.
pub fn rebuild_from_rows<B: Backend>(
    rows: &[Row],
    config: &AssemblyConfig,
    backend: &mut B,
) -> AssemblyResult<AssemblyReport> {
    let engine = LayoutEngine::from_config(config)?;
    let script = parse_rows(rows, &config.media_dir)?;
    let mut state = TimelineState::new();
    rebuild(backend, &mut state, &engine, &script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::fonts::DirectoryFontResolver;
    use ritebite_edit_script::{
        AudioSegment, Canvas, Cell, ClipSegment, ColorSegment, FrameRange, HexColor, ImageSegment,
        NormalizedPoint, Scale, TextSegment,
    };
    use std::path::PathBuf;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(Canvas::FULL_HD, 50.0, DirectoryFontResolver::new("/fonts", "ttf"))
    }

    fn clip(file: &str, start: i64, end: i64) -> ClipSegment {
        ClipSegment {
            file: PathBuf::from("/media").join(file),
            range: FrameRange { start, end },
            volume: 1.0,
            transition: false,
            channel: 1,
            show: true,
        }
    }

    fn caption(font: &str) -> TextSegment {
        TextSegment {
            text: "Hi".to_string(),
            range: FrameRange { start: 1, end: 10 },
            font: font.to_string(),
            size: 32.0,
            position: NormalizedPoint::CENTER,
            color: HexColor::parse("ffffff").unwrap(),
            shadow: false,
            boxed: true,
            box_color: HexColor::parse("000000").unwrap(),
            bold: false,
            italic: false,
            channel: 3,
            group: false,
            show: true,
        }
    }

    #[test]
    fn test_empty_rebuild_only_clears_and_sets_end() {
        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        let report = rebuild(&mut backend, &mut state, &engine(), &EditScript::default()).unwrap();

        assert_eq!(
            backend.calls(),
            &[BackendCall::Clear, BackendCall::SetTimelineEnd { frame: 0 }]
        );
        assert_eq!(report.max_end_frame, 0);
        assert_eq!(report.segments_placed, 0);
        assert_eq!(report.clip_group, None);
    }

    #[test]
    fn test_all_hidden_rebuild_only_clears_and_sets_end() {
        let mut hidden_clip = clip("a.mp4", 1, 100);
        hidden_clip.show = false;
        let mut hidden_text = caption("Lato");
        hidden_text.show = false;
        let script = EditScript {
            clips: vec![hidden_clip],
            texts: vec![hidden_text],
            images: vec![ImageSegment {
                file: PathBuf::from("/media/logo.png"),
                range: FrameRange { start: 1, end: 400 },
                position: NormalizedPoint::CENTER,
                scale: Scale::IDENTITY,
                channel: 6,
                show: false,
            }],
            colors: vec![ColorSegment {
                color: HexColor::parse("ff000080").unwrap(),
                range: FrameRange { start: 10, end: 500 },
                position: NormalizedPoint::CENTER,
                scale: Scale::IDENTITY,
                channel: 4,
                show: false,
            }],
            audios: vec![AudioSegment {
                file: PathBuf::from("/media/theme.mp3"),
                range: FrameRange { start: 1, end: 600 },
                volume: 0.5,
                channel: 5,
                show: false,
            }],
        };

        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        state.cursor = 75;
        state.extend_to(75);
        let report = rebuild(&mut backend, &mut state, &engine(), &script).unwrap();

        assert_eq!(
            backend.calls(),
            &[BackendCall::Clear, BackendCall::SetTimelineEnd { frame: 0 }]
        );
        assert_eq!(report.commands_issued, 1);
        assert_eq!(report.segments_placed, 0);
        assert_eq!(report.clip_group, None);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.max_end_frame, 0);
    }

    #[test]
    fn test_group_collects_every_clip_strip() {
        let script = EditScript {
            clips: vec![clip("a.mp4", 1, 10), clip("b.mp4", 1, 10)],
            ..EditScript::default()
        };
        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        let report = rebuild(&mut backend, &mut state, &engine(), &script).unwrap();

        // Each clip yields picture and sound strips: ids 1..=4, group 5.
        let group = backend
            .calls()
            .iter()
            .find_map(|call| match call {
                BackendCall::Group { members, strip } => Some((members.clone(), *strip)),
                _ => None,
            })
            .unwrap();
        assert_eq!(group.0, vec![StripId(1), StripId(2), StripId(3), StripId(4)]);
        assert_eq!(report.clip_group, Some(group.1));
        assert_eq!(report.clips_placed, 2);
        assert_eq!(report.commands_issued, 4);
        assert_eq!(backend.timeline_end(), Some(20));
    }

    #[test]
    fn test_fonts_are_loaded_once_per_run() {
        let script = EditScript {
            texts: vec![caption("Lato"), caption("Lato"), caption("Mono.otf")],
            ..EditScript::default()
        };
        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        rebuild(&mut backend, &mut state, &engine(), &script).unwrap();

        let loaded: Vec<_> = backend
            .calls()
            .iter()
            .filter_map(|call| match call {
                BackendCall::LoadFont { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            loaded,
            vec![PathBuf::from("/fonts/Lato.ttf"), PathBuf::from("/fonts/Mono.otf")]
        );
        assert_eq!(state.fonts.len(), 2);

        // A rebuild clears the cache along with the timeline.
        rebuild(&mut backend, &mut state, &engine(), &script).unwrap();
        let loads = backend
            .calls_since_clear()
            .iter()
            .filter(|call| matches!(call, BackendCall::LoadFont { .. }))
            .count();
        assert_eq!(loads, 2);
    }

    #[test]
    fn test_backend_failure_aborts_remaining_commands() {
        let script = EditScript {
            clips: vec![clip("a.mp4", 1, 10)],
            texts: vec![caption("Lato")],
            ..EditScript::default()
        };
        let mut backend = RecordingBackend::new().fail_on("insert_text");
        let mut state = TimelineState::new();
        let err = rebuild(&mut backend, &mut state, &engine(), &script).unwrap_err();

        assert!(matches!(err, AssemblyError::Backend { operation: "insert_text", .. }));
        assert!(backend.timeline_end().is_none());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        state.cursor = 40;
        state.extend_to(80);
        clear(&mut backend, &mut state).unwrap();
        assert_eq!(state.cursor, 0);
        assert_eq!(state.max_end_frame, 0);
        assert_eq!(backend.calls(), &[BackendCall::Clear]);
        assert_eq!(backend.timeline_end(), None);
    }

    #[test]
    fn test_clear_all_removes_proxy_cache() {
        let media = std::env::temp_dir().join(format!("ritebite-proxy-{}", std::process::id()));
        let config = AssemblyConfig {
            media_dir: media.clone(),
            ..AssemblyConfig::default()
        };
        std::fs::create_dir_all(config.proxy_dir().join("intro")).unwrap();
        std::fs::write(config.proxy_dir().join("intro").join("proxy_50.avi"), b"x").unwrap();

        let mut backend = RecordingBackend::new();
        let mut state = TimelineState::new();
        assert!(clear_all(&mut backend, &mut state, &config).unwrap());
        assert!(!config.proxy_dir().exists());
        assert!(media.exists());
        assert!(!clear_all(&mut backend, &mut state, &config).unwrap());

        std::fs::remove_dir_all(&media).unwrap();
    }

    #[test]
    fn test_rebuild_from_rows() {
        let rows: Vec<Row> = vec![
            vec![Cell::from("clip")],
            vec![
                Cell::from("a.mp4"),
                Cell::from(10),
                Cell::from(19),
                Cell::from(0.8),
                Cell::from("NO"),
                Cell::from(1),
                Cell::from(1),
            ],
        ];
        let config = AssemblyConfig {
            media_dir: PathBuf::from("/media"),
            ..AssemblyConfig::default()
        };
        let mut backend = RecordingBackend::new();
        let report = rebuild_from_rows(&rows, &config, &mut backend).unwrap();
        assert_eq!(report.max_end_frame, 10);
        assert_eq!(report.cursor, 10);

        let BackendCall::InsertClip { clip, .. } = &backend.calls()[1] else {
            panic!("expected clip insert");
        };
        assert_eq!(clip.file, PathBuf::from("/media/a.mp4"));
        assert_eq!(clip.strip_start, -9);
    }
}
