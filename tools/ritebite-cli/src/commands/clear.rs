//! Remove the backend proxy cache.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use ritebite_common::AssemblyConfig;
use ritebite_layout::{clear_all, RecordingBackend, TimelineState};

pub fn run(media_dir: Option<PathBuf>, base: &AssemblyConfig) -> anyhow::Result<()> {
    let config = AssemblyConfig {
        media_dir: media_dir.unwrap_or_else(|| base.media_dir.clone()),
        ..base.clone()
    };
    config.validate()?;

    let mut backend = RecordingBackend::new();
    let mut state = TimelineState::new();
    let proxy_dir = config.proxy_dir();
    let removed = clear_all(&mut backend, &mut state, &config)
        .with_context(|| format!("Failed to clear {}", config.media_dir.display()))?;

    info!(media_dir = %config.media_dir.display(), removed, "Cleared timeline");
    if removed {
        println!("Removed proxy cache: {}", proxy_dir.display());
    } else {
        println!("No proxy cache at {}", proxy_dir.display());
    }
    Ok(())
}
