//! Show or save the effective configuration.

use anyhow::Context;

use ritebite_common::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path_only: bool, save: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if save {
        config
            .save()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
