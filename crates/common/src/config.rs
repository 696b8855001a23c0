//! Application and assembly configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RitebiteError, RitebiteResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings handed to the layout engine for every assembly run.
    pub assembly: AssemblyConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Everything an assembly run needs from its caller.
///
/// The layout engine never reads the environment; the host builds one of
/// these and passes it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Directory that relative clip, image and sound file names resolve against.
    pub media_dir: PathBuf,

    /// Canvas width in pixels.
    pub canvas_width: u32,

    /// Canvas height in pixels.
    pub canvas_height: u32,

    /// Frame rate used for transition overlaps when the media cannot be probed.
    pub default_frame_rate: f64,

    /// Directory holding font files referenced by text rows.
    pub font_dir: PathBuf,

    /// Extension appended to font ids that carry none.
    pub font_extension: String,

    /// Name of the backend's proxy cache directory inside `media_dir`.
    pub proxy_dir_name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ritebite_layout=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assembly: AssemblyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("."),
            canvas_width: 1920,
            canvas_height: 1080,
            default_frame_rate: 50.0,
            font_dir: PathBuf::from("fonts"),
            font_extension: "ttf".to_string(),
            proxy_dir_name: "BL_proxy".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AssemblyConfig {
    /// Derive media and font directories from an edit script location.
    ///
    /// Media lives in a folder named after the sheet next to the script;
    /// fonts live in a sibling `fonts` folder.
    pub fn for_script(script_path: impl AsRef<Path>, sheet: &str) -> Self {
        let script_dir = script_path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            media_dir: script_dir.join(sheet),
            font_dir: script_dir.join("fonts"),
            ..Self::default()
        }
    }

    /// Reject values the layout engine cannot work with.
    pub fn validate(&self) -> RitebiteResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(RitebiteError::config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.default_frame_rate.is_finite() || self.default_frame_rate <= 0.0 {
            return Err(RitebiteError::config(format!(
                "default frame rate must be positive, got {}",
                self.default_frame_rate
            )));
        }
        if self.proxy_dir_name.is_empty() || self.proxy_dir_name.contains(&['/', '\\'][..]) {
            return Err(RitebiteError::config(format!(
                "proxy directory name must be a single path component, got {:?}",
                self.proxy_dir_name
            )));
        }
        Ok(())
    }

    /// Location of the backend's proxy cache.
    pub fn proxy_dir(&self) -> PathBuf {
        self.media_dir.join(&self.proxy_dir_name)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit file.
    pub fn load_from(path: impl AsRef<Path>) -> RitebiteResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RitebiteError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.assembly.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("ritebite").join("config.json")
}
