//! Command-line surface and logging setup shared by the binaries.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "digger")]
#[command(about = "Digs a random dungeon and prints it as text", long_about = None)]
pub struct Args {
    /// Stage width in tiles
    #[arg(value_parser = parse_size)]
    pub width: u16,

    /// Stage height in tiles
    #[arg(value_parser = parse_size)]
    pub height: u16,

    /// Seed for a reproducible map; drawn at random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "imagify")]
#[command(about = "Turns a text dungeon map on stdin into a greyscale TGA image", long_about = None)]
pub struct ImagifyArgs {
    /// Write the image here instead of stdout
    #[arg(short)]
    pub output: Option<PathBuf>,

    /// Map width in tiles
    #[arg(value_parser = parse_size)]
    pub width: u16,

    /// Map height in tiles
    #[arg(value_parser = parse_size)]
    pub height: u16,

    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// A positive tile count.
pub fn parse_size(s: &str) -> Result<u16, ConfigError> {
    match s.trim().parse::<u16>() {
        Ok(0) => Err(ConfigError::InvalidArguments(format!(
            "size must be positive, got {s}"
        ))),
        Ok(n) => Ok(n),
        Err(err) => Err(ConfigError::InvalidArguments(format!("{s:?}: {err}"))),
    }
}

/// Logs go to stderr so stdout carries only the map or image. `RUST_LOG`
/// overrides `level`.
pub fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
