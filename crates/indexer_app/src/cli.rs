use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "collection-indexer")]
#[command(about = "Scan the music collection folders and refresh the library index")]
#[command(version)]
pub struct Args {
    /// Which kind of scan to request
    #[arg(long, value_enum, default_value_t = Trigger::Outdated)]
    pub trigger: Trigger,

    /// With `--trigger album-artwork`, only fetch covers for albums without one
    #[arg(long)]
    pub only_when_no_cover: bool,

    /// Application data directory (settings, logs, last-scan state)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Trigger {
    Outdated,
    FoldersChanged,
    Always,
    AlbumArtwork,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_outdated_refresh_on_terminal() {
        let args = Args::parse_from(["collection-indexer"]);
        assert_eq!(args.trigger, Trigger::Outdated);
        assert_eq!(args.log, LogDestination::Terminal);
        assert!(!args.only_when_no_cover);
        assert!(args.data_dir.is_none());
    }

    #[test]
    fn parses_artwork_flags() {
        let args = Args::parse_from([
            "collection-indexer",
            "--trigger",
            "album-artwork",
            "--only-when-no-cover",
            "--log",
            "both",
        ]);
        assert_eq!(args.trigger, Trigger::AlbumArtwork);
        assert!(args.only_when_no_cover);
        assert_eq!(args.log, LogDestination::Both);
    }
}
