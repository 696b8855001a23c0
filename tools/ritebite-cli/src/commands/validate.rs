//! Validate an edit script row file.

use std::path::PathBuf;

use tracing::{info, warn};

use ritebite_edit_script::{parse_rows_lenient, SectionKind};

use super::{load_rows, rows_dir};

pub fn run(path: PathBuf, media_dir: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Validating edit script: {}", path.display());

    let rows = load_rows(&path)?;
    let media_dir = media_dir.unwrap_or_else(|| rows_dir(&path));
    let (script, errors) = parse_rows_lenient(&rows, &media_dir);

    println!("  Rows: {}", rows.len());
    println!("  Media: {}", media_dir.display());
    for kind in SectionKind::ALL {
        println!(
            "  {:<6} {} ({} shown)",
            kind.keyword(),
            script.count(kind),
            script.visible_count(kind)
        );
    }

    if errors.is_empty() {
        info!(path = %path.display(), rows = rows.len(), "Edit script is valid");
        println!("\nEdit script is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for error in &errors {
        warn!(row = ?error.row(), "{error}");
        println!("  - {error}");
    }
    anyhow::bail!("{} issue(s) found in {}", errors.len(), path.display())
}
