use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Turns a facilitator log into an interaction graph and a dialog video.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Facilitator log to visualize.
    pub log: PathBuf,

    /// YAML configuration file (agents, timeline and animation settings).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the numbered frame images are written to.
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,

    /// Path of the encoded video.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of render workers (default: one per core).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Graph layout engine.
    #[arg(long, value_enum, default_value_t = LayoutKind::Dot)]
    pub layout: LayoutKind,

    /// Also write the interaction graph as Graphviz source to this file.
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Render frames but skip the ffmpeg step.
    #[arg(long)]
    pub no_encode: bool,

    /// Parse the log and print the session summary only.
    #[arg(long)]
    pub summary_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    /// Graphviz `dot`
    Dot,
    /// Built-in circular layout, no external tools
    Circular,
}
