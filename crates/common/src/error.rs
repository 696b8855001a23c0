//! Error types shared across RiteBite crates.

use std::path::PathBuf;

/// Top-level error type for configuration and host-side operations.
///
/// Edit-script and layout failures have their own typed errors in their
/// crates; this type covers what sits around them.
#[derive(Debug, thiserror::Error)]
pub enum RitebiteError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using RitebiteError.
pub type RitebiteResult<T> = Result<T, RitebiteError>;

impl RitebiteError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_messages() {
        let err = RitebiteError::config("canvas width must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: canvas width must be positive"
        );

        let err = RitebiteError::FileNotFound {
            path: PathBuf::from("/etc/ritebite/config.json"),
        };
        assert_eq!(err.to_string(), "File not found: /etc/ritebite/config.json");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing rows.json");
        let err: RitebiteError = io.into();
        assert_eq!(err.to_string(), "missing rows.json");
    }
}
