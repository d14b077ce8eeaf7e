//! Logger set-up for the `collection-indexer` binary.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "indexer.log";
const LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// `indexer.log` in the data directory, truncated on every start.
    File,
    Terminal,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Installs the global logger. A log file that cannot be created is reported
/// on stderr and skipped; with nothing left to log to, no logger is installed.
pub fn initialize(destination: LogDestination, data_dir: &Path) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            LEVEL,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        if let Some(file_logger) = file_logger(config, &data_dir.join(LOG_FILENAME)) {
            loggers.push(file_logger);
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn file_logger(config: Config, path: &Path) -> Option<Box<WriteLogger<File>>> {
    File::create(path)
        .map(|file| WriteLogger::new(LEVEL, config, file))
        .map_err(|err| eprintln!("Warning: could not create log file {:?}: {}", path, err))
        .ok()
}
