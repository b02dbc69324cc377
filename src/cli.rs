use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Initialize the logger with the specified level
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Light through breathing stained glass
#[derive(Debug, Parser)]
#[command(name = "stained-glass", version)]
pub struct Args {
    /// YAML scene file; the two-light default scene when absent
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 120)]
    pub frames: usize,

    /// Clock advance per frame
    #[arg(short, long, default_value_t = 16.0)]
    pub time_step: f64,

    /// Directory the frames are written to
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,

    /// Write every N-th frame (the last frame is always written)
    #[arg(short, long, default_value_t = 10)]
    pub every: usize,

    /// Seed for random shard properties, overrides the scene file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log verbosity: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}
