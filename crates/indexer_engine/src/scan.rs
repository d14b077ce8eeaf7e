use std::path::{Path, PathBuf};

use indexer_core::{JobDescriptor, ProgressMessage, TaskKind};
use indexer_logging::indexer_warn;
use walkdir::WalkDir;

use crate::{IndexError, IndexSummary, Indexer, ProgressReporter};

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a", "wav", "wma", "ape"];

/// Discovers audio files under the collection folders and reports them as
/// added tracks. Tag reading and storage happen elsewhere.
#[derive(Debug, Clone)]
pub struct FolderScanIndexer {
    folders: Vec<PathBuf>,
}

impl FolderScanIndexer {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }

    fn scan_tracks(folders: &[PathBuf]) -> Result<Vec<PathBuf>, IndexError> {
        let mut tracks = Vec::new();
        for folder in folders {
            if let Err(source) = std::fs::metadata(folder) {
                return Err(IndexError::FolderUnreadable {
                    path: folder.clone(),
                    source,
                });
            }
            for entry in WalkDir::new(folder).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        indexer_warn!("skipping unreadable entry under {:?}: {}", folder, err);
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_audio_file(entry.path()) {
                    tracks.push(entry.into_path());
                }
            }
        }
        tracks.sort();
        tracks.dedup();
        Ok(tracks)
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Reports one `AddingTracks` per whole percent so large collections do not
/// flood the channel.
fn report_added(progress: &dyn ProgressReporter, total: usize) {
    let mut last_percent = None;
    for added in 1..=total {
        let percent = added * 100 / total;
        if last_percent == Some(percent) {
            continue;
        }
        last_percent = Some(percent);
        progress.report(ProgressMessage::AddingTracks {
            added_count: added as u64,
            percentage: percent as f64,
        });
    }
}

#[async_trait::async_trait]
impl Indexer for FolderScanIndexer {
    async fn index(
        &self,
        job: &JobDescriptor,
        progress: &dyn ProgressReporter,
    ) -> Result<IndexSummary, IndexError> {
        if job.task() == TaskKind::AlbumArtworkOnly {
            progress.report(ProgressMessage::UpdatingAlbumArtwork);
            progress.report(ProgressMessage::Dismiss);
            return Ok(IndexSummary::default());
        }

        progress.report(ProgressMessage::Refreshing);
        let folders = self.folders.clone();
        let scanned = tokio::task::spawn_blocking(move || Self::scan_tracks(&folders))
            .await
            .map_err(|err| IndexError::Aborted(err.to_string()))?;
        let tracks = match scanned {
            Ok(tracks) => tracks,
            Err(err) => {
                progress.report(ProgressMessage::Dismiss);
                return Err(err);
            }
        };

        report_added(progress, tracks.len());
        progress.report(ProgressMessage::Dismiss);
        Ok(IndexSummary {
            discovered_tracks: tracks.len() as u64,
        })
    }
}
