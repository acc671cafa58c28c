//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sentrycam - home surveillance camera with a live stream and snapshot gallery.
///
/// Running without a subcommand starts the web server.
#[derive(Parser, Debug)]
#[command(name = "sentrycam", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "SENTRYCAM_FORMAT"
    )]
    pub format: OutputFormat,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path to a TOML config file (defaults to the user config dir)
    #[arg(long, short = 'c', global = true, env = "SENTRYCAM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
}

impl Cli {
    /// Returns true if output should be JSON.
    pub const fn use_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Application ===
    /// Start the surveillance web server (the default)
    Serve(ServeArgs),

    // === Snapshot Management ===
    /// Take one snapshot from the camera
    Snapshot(SnapshotArgs),

    /// List stored snapshots, newest first
    Gallery(GalleryArgs),

    /// Delete a stored snapshot
    Delete(DeleteArgs),

    // === Utilities ===
    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long, short = 'p', env = "SENTRYCAM_PORT")]
    pub port: Option<u16>,

    /// Bind address (overrides config)
    #[arg(long, env = "SENTRYCAM_BIND")]
    pub bind: Option<String>,

    /// Snapshot storage directory (overrides config)
    #[arg(long, short = 'd', env = "SENTRYCAM_DIR")]
    pub dir: Option<PathBuf>,

    /// Camera device index (overrides config)
    #[arg(long, env = "SENTRYCAM_CAMERA")]
    pub camera: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct SnapshotArgs {
    /// Snapshot storage directory (overrides config)
    #[arg(long, short = 'd', env = "SENTRYCAM_DIR")]
    pub dir: Option<PathBuf>,

    /// Camera device index (overrides config)
    #[arg(long, env = "SENTRYCAM_CAMERA")]
    pub camera: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct GalleryArgs {
    /// Snapshot storage directory (overrides config)
    #[arg(long, short = 'd', env = "SENTRYCAM_DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Snapshot filename to delete (basename only)
    pub filename: String,

    /// Snapshot storage directory (overrides config)
    #[arg(long, short = 'd', env = "SENTRYCAM_DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
