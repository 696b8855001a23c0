//! Font lookup: font ids from the script to files and backend handles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backend::{Backend, BackendResult, FontHandle};

/// Maps a script font id to the font file the backend should load.
pub trait FontResolver {
    fn resolve(&self, font_id: &str) -> PathBuf;
}

/// Looks fonts up as `<dir>/<id>.<extension>`.
///
/// An id that already carries an extension is joined as is.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryFontResolver {
    pub dir: PathBuf,
    pub extension: String,
}

impl DirectoryFontResolver {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }
}

impl FontResolver for DirectoryFontResolver {
    fn resolve(&self, font_id: &str) -> PathBuf {
        let file = Path::new(font_id);
        if file.extension().is_some() || self.extension.is_empty() {
            self.dir.join(file)
        } else {
            self.dir.join(format!("{font_id}.{}", self.extension))
        }
    }
}

/// Fonts already loaded by the backend, keyed by font id.
///
/// Each id is loaded at most once per run.
#[derive(Debug, Clone, Default)]
pub struct FontCache {
    fonts: HashMap<String, FontHandle>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `font_id`, loading `path` through the backend on first use.
    pub fn get_or_load<B: Backend + ?Sized>(
        &mut self,
        font_id: &str,
        path: &Path,
        backend: &mut B,
    ) -> BackendResult<FontHandle> {
        if let Some(handle) = self.fonts.get(font_id) {
            return Ok(*handle);
        }

        let handle = backend.load_font(path)?;
        debug!(font = font_id, path = %path.display(), "Loaded font");
        self.fonts.insert(font_id.to_string(), handle);
        Ok(handle)
    }

    pub fn get(&self, font_id: &str) -> Option<FontHandle> {
        self.fonts.get(font_id).copied()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
