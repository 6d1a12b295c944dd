use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "octray")]
#[command(about = "Offline path tracer with an octant-partitioned scene")]
pub struct Args {
    /// Image width in pixels
    #[arg(long)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long)]
    pub height: u32,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub max_depth: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: u32,

    /// Worker threads (0 uses every available core)
    #[arg(long)]
    pub cores: usize,

    /// Base seed for the per-row random streams
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Octant split depth of the acceleration structure
    #[arg(long, default_value_t = 2)]
    pub split_depth: u32,

    /// JSON scene description (defaults to the built-in demo scene)
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Output path without extension; both .png and .ppm are written
    #[arg(short, long, default_value = "render")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// `None` when every available core should be used.
    pub fn workers(&self) -> Option<usize> {
        (self.cores > 0).then_some(self.cores)
    }

    /// Output path with the given extension appended to the stem.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        let mut path = self.output.clone().into_os_string();
        path.push(".");
        path.push(extension);
        PathBuf::from(path)
    }
}
