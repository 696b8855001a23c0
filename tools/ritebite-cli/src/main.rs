//! RiteBite CLI: check edit scripts and preview the timelines they produce.
//!
//! Usage:
//!   ritebite validate <ROWS>    Parse a row file and report every issue
//!   ritebite plan <ROWS>        Plan a timeline and print its commands
//!   ritebite clear-all          Remove the proxy cache under a media dir
//!   ritebite config             Show or save the effective configuration
//!
//! Row files are JSON arrays of arrays, one inner array per script row.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ritebite_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "ritebite",
    about = "Assemble video timelines from tabular edit scripts",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a row file and report counts and issues
    Validate {
        /// Path to the JSON row file
        path: PathBuf,

        /// Directory media file names resolve against
        #[arg(long)]
        media_dir: Option<PathBuf>,
    },

    /// Plan the timeline for a row file and print the backend commands
    Plan {
        /// Path to the JSON row file
        path: PathBuf,

        #[command(flatten)]
        assembly: commands::AssemblyArgs,

        /// Print the recorded backend calls as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the backend proxy cache from a media directory
    ClearAll {
        /// Media directory holding the proxy cache
        #[arg(long)]
        media_dir: Option<PathBuf>,
    },

    /// Show or save the effective configuration
    Config {
        /// Print the config file location instead
        #[arg(long)]
        path: bool,

        /// Write the effective configuration to the config file
        #[arg(long, conflicts_with = "path")]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    ritebite_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Validate { path, media_dir } => commands::validate::run(path, media_dir),
        Commands::Plan {
            path,
            assembly,
            json,
        } => commands::plan::run(path, assembly, json, &config.assembly),
        Commands::ClearAll { media_dir } => commands::clear::run(media_dir, &config.assembly),
        Commands::Config { path, save } => commands::config::run(&config, path, save),
    }
}
