//! threadview - Entry Point

use clap::Parser;
use std::path::PathBuf;
use threadview::config::CliOverrides;
use threadview::preview::{BackendChoice, RenderMode};
use tracing::info;

/// threadview - read forum threads in the terminal
#[derive(Parser, Debug)]
#[command(name = "threadview")]
#[command(version)]
#[command(about = "Terminal viewer for forum threads with inline image previews")]
pub struct Args {
    /// Path to a thread JSON file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Image preview backend
    #[arg(long, value_enum)]
    pub image_backend: Option<BackendChoice>,

    /// Image preview mode
    #[arg(long, value_enum)]
    pub image_mode: Option<RenderMode>,

    /// Forum origin used to resolve relative and upload:// image references
    #[arg(long)]
    pub base_url: Option<String>,

    /// Keep previews that look like flat block noise
    #[arg(long)]
    pub no_quality_filter: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            image_backend: self.image_backend,
            image_mode: self.image_mode,
            base_url: self.base_url.clone(),
            no_quality_filter: self.no_quality_filter,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = threadview::config::resolve(args.config.clone(), args.overrides())?;

    // Held until exit so buffered log records are flushed.
    let _log_guard = threadview::logging::init(&config.log_file_path)?;
    config.log_ignored_env();

    info!(config = ?config, "Configuration loaded and resolved");

    let thread = threadview::source::detect_input_source(args.file.clone())?.load()?;

    threadview::view::run_with_thread(thread, &config)?;

    Ok(())
}
