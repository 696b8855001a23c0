//! Plan a timeline and show the backend calls it would make.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use ritebite_common::{render_output_path_now, AssemblyConfig};
use ritebite_layout::{rebuild_from_rows, BackendCall, RecordingBackend};

use super::{load_rows, AssemblyArgs};

pub fn run(
    path: PathBuf,
    args: AssemblyArgs,
    json: bool,
    base: &AssemblyConfig,
) -> anyhow::Result<()> {
    let config = args.resolve(&path, base);
    debug!(
        media_dir = %config.media_dir.display(),
        font_dir = %config.font_dir.display(),
        "Resolved assembly settings"
    );
    let rows = load_rows(&path)?;

    let mut backend = RecordingBackend::new();
    let report = rebuild_from_rows(&rows, &config, &mut backend)
        .with_context(|| format!("Failed to assemble {}", path.display()))?;
    let render_output = render_output_path_now(&config.media_dir);
    info!(
        path = %path.display(),
        calls = backend.calls().len(),
        segments = report.segments_placed,
        max_end_frame = report.max_end_frame,
        "Planned timeline"
    );

    if json {
        let value = serde_json::json!({
            "report": report,
            "calls": backend.calls(),
            "render_output": render_output,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Timeline for {}", path.display());
    println!("  Media: {}", config.media_dir.display());
    println!(
        "  Canvas: {}x{} (fallback {} fps)",
        config.canvas_width, config.canvas_height, config.default_frame_rate
    );
    println!();

    println!("Backend calls:");
    for call in backend.calls() {
        println!("  {}", describe(call));
    }
    println!();

    println!("Summary:");
    println!("  Clips placed: {}", report.clips_placed);
    println!("  Segments placed: {}", report.segments_placed);
    println!("  Clip cursor: {}", report.cursor);
    println!("  Timeline end: {}", report.max_end_frame);
    println!("  Render output: {}", render_output.display());

    Ok(())
}

fn describe(call: &BackendCall) -> String {
    match call {
        BackendCall::Clear => "clear".to_string(),
        BackendCall::LoadFont { path, font } => {
            format!("load font {} -> #{}", path.display(), font.0)
        }
        BackendCall::InsertClip { clip, strips } => {
            let fade = clip
                .fade_in
                .map(|fade| format!(", fade in {}", fade.frames))
                .unwrap_or_default();
            format!(
                "clip {} ch{} frames {}..{} (strip at {}, trim {}, volume {}{fade}) -> {}",
                clip.file.display(),
                clip.channel,
                clip.visible_start(),
                clip.end(),
                clip.strip_start,
                clip.trim_offset,
                clip.volume,
                strip_list(strips.iter().map(|s| s.0))
            )
        }
        BackendCall::InsertAudio { audio, strip } => format!(
            "sound {} ch{} frames {}..{} (volume {}) -> #{}",
            audio.file.display(),
            audio.frames.channel,
            audio.frames.start,
            audio.frames.end(),
            audio.volume,
            strip.0
        ),
        BackendCall::InsertColor { color, strip } => format!(
            "color #{} ch{} frames {}..{} at ({:.1}, {:.1}) -> #{}",
            color.color.hex,
            color.frames.channel,
            color.frames.start,
            color.frames.end(),
            color.offset.x,
            color.offset.y,
            strip.0
        ),
        BackendCall::InsertText { text, font, strip } => format!(
            "text {:?} ch{} frames {}..{} font #{} size {} at ({:.3}, {:.3}) -> #{}",
            text.text,
            text.frames.channel,
            text.frames.start,
            text.frames.end(),
            font.0,
            text.size,
            text.location.x,
            text.location.y,
            strip.0
        ),
        BackendCall::InsertImage { image, strip } => format!(
            "image {} ch{} frames {}..{} at ({:.1}, {:.1}) -> #{}",
            image.file.display(),
            image.frames.channel,
            image.frames.start,
            image.frames.end(),
            image.offset.x,
            image.offset.y,
            strip.0
        ),
        BackendCall::Group { members, strip } => format!(
            "group {} -> #{}",
            strip_list(members.iter().map(|s| s.0)),
            strip.0
        ),
        BackendCall::SetTimelineEnd { frame } => format!("set timeline end {frame}"),
    }
}

fn strip_list(ids: impl Iterator<Item = u64>) -> String {
    ids.map(|id| format!("#{id}")).collect::<Vec<_>>().join(" ")
}
