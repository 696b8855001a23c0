//! Render output naming.
//!
//! Rendering itself belongs to the editing backend; RiteBite only decides
//! where the finished file should land.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

/// File name prefix for rendered sequences.
pub const RENDER_PREFIX: &str = "stitched_together";

/// Container extension of rendered sequences.
pub const RENDER_EXTENSION: &str = "mp4";

/// Path of the render output for a run started at `now`.
///
/// The time of day keeps successive renders in the same folder apart:
/// `<dir>/stitched_together_14-05-09.mp4`.
pub fn render_output_path<Tz: TimeZone>(dir: impl AsRef<Path>, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%H-%M-%S");
    dir.as_ref()
        .join(format!("{RENDER_PREFIX}_{stamp}.{RENDER_EXTENSION}"))
}

/// Render output path stamped with the local wall clock.
pub fn render_output_path_now(dir: impl AsRef<Path>) -> PathBuf {
    render_output_path(dir, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_render_output_path_uses_time_of_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap();
        let path = render_output_path("/media/nimona", &now);
        assert_eq!(
            path,
            PathBuf::from("/media/nimona/stitched_together_14-05-09.mp4")
        );
    }

    #[test]
    fn test_render_output_path_now_stays_in_dir() {
        let path = render_output_path_now("renders");
        assert!(path.starts_with("renders"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
    }
}
