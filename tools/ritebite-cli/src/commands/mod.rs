pub mod clear;
pub mod config;
pub mod plan;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use ritebite_common::AssemblyConfig;
use ritebite_edit_script::{parse_rows_json, Row};

/// Assembly settings that can be overridden per invocation.
#[derive(Debug, Default, Args)]
pub struct AssemblyArgs {
    /// Sheet name; media and fonts are then looked up next to the row file
    #[arg(long)]
    pub sheet: Option<String>,

    /// Directory media file names resolve against
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Directory holding font files
    #[arg(long)]
    pub font_dir: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Frame rate used when a clip's rate is unknown
    #[arg(long)]
    pub fps: Option<f64>,
}

impl AssemblyArgs {
    /// Layer these flags over the configured settings.
    ///
    /// Without `--sheet` or `--media-dir`, media resolves against the row
    /// file's own directory.
    pub fn resolve(&self, rows_path: &Path, base: &AssemblyConfig) -> AssemblyConfig {
        let mut config = match &self.sheet {
            Some(sheet) => AssemblyConfig {
                canvas_width: base.canvas_width,
                canvas_height: base.canvas_height,
                default_frame_rate: base.default_frame_rate,
                font_extension: base.font_extension.clone(),
                proxy_dir_name: base.proxy_dir_name.clone(),
                ..AssemblyConfig::for_script(rows_path, sheet)
            },
            None => AssemblyConfig {
                media_dir: rows_dir(rows_path),
                ..base.clone()
            },
        };

        if let Some(dir) = &self.media_dir {
            config.media_dir = dir.clone();
        }
        if let Some(dir) = &self.font_dir {
            config.font_dir = dir.clone();
        }
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(height) = self.height {
            config.canvas_height = height;
        }
        if let Some(fps) = self.fps {
            config.default_frame_rate = fps;
        }
        config
    }
}

/// Directory containing a row file.
pub fn rows_dir(rows_path: &Path) -> PathBuf {
    rows_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read and decode a JSON row file.
pub fn load_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read row file {}", path.display()))?;
    parse_rows_json(&content)
        .with_context(|| format!("Row file {} is not a JSON array of rows", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_defaults_to_rows_dir() {
        let config = AssemblyArgs::default()
            .resolve(Path::new("/shows/pilot/rows.json"), &AssemblyConfig::default());
        assert_eq!(config.media_dir, PathBuf::from("/shows/pilot"));
        assert_eq!(config.font_dir, PathBuf::from("fonts"));
        assert_eq!(rows_dir(Path::new("rows.json")), PathBuf::from("."));
    }

    #[test]
    fn test_sheet_and_overrides() {
        let base = AssemblyConfig {
            canvas_width: 1280,
            canvas_height: 720,
            ..AssemblyConfig::default()
        };
        let args = AssemblyArgs {
            sheet: Some("episode1".to_string()),
            fps: Some(25.0),
            ..AssemblyArgs::default()
        };
        let config = args.resolve(Path::new("/shows/pilot/rows.json"), &base);
        assert_eq!(config.media_dir, PathBuf::from("/shows/pilot/episode1"));
        assert_eq!(config.font_dir, PathBuf::from("/shows/pilot/fonts"));
        assert_eq!(config.canvas_width, 1280);
        assert_eq!(config.default_frame_rate, 25.0);
    }
}
