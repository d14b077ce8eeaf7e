use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What the worker is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    /// Refresh only what is out of date.
    Outdated,
    /// Full refresh.
    Always,
    /// Only (re)fetch album artwork.
    #[serde(rename = "albumArtwork")]
    AlbumArtworkOnly,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Outdated => "outdated",
            TaskKind::Always => "always",
            TaskKind::AlbumArtworkOnly => "albumArtwork",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The policy a caller used when asking for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTrigger {
    IfOutdated,
    IfFoldersChanged,
    Always,
    AlbumArtworkOnly { only_when_no_cover: bool },
}

impl RunTrigger {
    pub fn task_kind(self) -> TaskKind {
        match self {
            RunTrigger::IfOutdated => TaskKind::Outdated,
            RunTrigger::IfFoldersChanged | RunTrigger::Always => TaskKind::Always,
            RunTrigger::AlbumArtworkOnly { .. } => TaskKind::AlbumArtworkOnly,
        }
    }
}

/// Settings snapshot read at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexingSettings {
    pub skip_removed_files_during_refresh: bool,
    pub download_missing_album_covers: bool,
    pub application_data_directory: PathBuf,
}

/// Parameters for one worker run. Built once per dispatch and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    task: TaskKind,
    skip_removed_files_during_refresh: bool,
    download_missing_album_covers: bool,
    application_data_directory: PathBuf,
    only_when_has_no_cover: bool,
}

impl JobDescriptor {
    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn skip_removed_files_during_refresh(&self) -> bool {
        self.skip_removed_files_during_refresh
    }

    pub fn download_missing_album_covers(&self) -> bool {
        self.download_missing_album_covers
    }

    pub fn application_data_directory(&self) -> &Path {
        &self.application_data_directory
    }

    /// Only meaningful for [`TaskKind::AlbumArtworkOnly`]; always false otherwise.
    pub fn only_when_has_no_cover(&self) -> bool {
        self.only_when_has_no_cover
    }
}

pub fn build_job_descriptor(trigger: RunTrigger, settings: &IndexingSettings) -> JobDescriptor {
    let only_when_has_no_cover = match trigger {
        RunTrigger::AlbumArtworkOnly { only_when_no_cover } => only_when_no_cover,
        _ => false,
    };
    JobDescriptor {
        task: trigger.task_kind(),
        skip_removed_files_during_refresh: settings.skip_removed_files_during_refresh,
        download_missing_album_covers: settings.download_missing_album_covers,
        application_data_directory: settings.application_data_directory.clone(),
        only_when_has_no_cover,
    }
}
