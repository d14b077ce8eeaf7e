//! On-disk state in the application data directory.
//!
//! Everything is stored as RON and replaced atomically: a temp file in the
//! same directory is written, synced and then renamed over the target.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexer_logging::indexer_warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub(crate) const LAST_SCAN_FILENAME: &str = ".last_scan.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("data directory {} is not usable: {source}", .path.display())]
    Unusable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode {file}: {source}")]
    Encode {
        file: String,
        #[source]
        source: ron::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The application data directory. Holding one means the directory existed
/// and accepted a temp file when it was opened.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Creates `root` if missing and rejects anything that is not a writable
    /// directory.
    pub fn open(root: PathBuf) -> Result<Self, PersistError> {
        match fs::metadata(&root) {
            Ok(meta) if !meta.is_dir() => return Err(PersistError::NotADirectory(root)),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&root).map_err(|source| PersistError::Unusable {
                    path: root.clone(),
                    source,
                })?;
            }
            Err(source) => return Err(PersistError::Unusable { path: root, source }),
        }
        NamedTempFile::new_in(&root).map_err(|source| PersistError::Unusable {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// `None` when the file is absent; unreadable or malformed files are
    /// logged and also read as `None`.
    pub fn read_ron<T: DeserializeOwned>(&self, filename: &str) -> Option<T> {
        let path = self.root.join(filename);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                indexer_warn!("Failed to read {:?}: {}", path, err);
                return None;
            }
        };
        match ron::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                indexer_warn!("Failed to parse {:?}: {}", path, err);
                None
            }
        }
    }

    /// Serializes `value` and atomically replaces `{root}/{filename}` with it.
    pub fn write_ron<T: Serialize>(
        &self,
        filename: &str,
        value: &T,
    ) -> Result<PathBuf, PersistError> {
        let content = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::new())
            .map_err(|source| PersistError::Encode {
                file: filename.to_string(),
                source,
            })?;

        let target = self.root.join(filename);
        let write_error = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(write_error)?;
        tmp.write_all(content.as_bytes()).map_err(write_error)?;
        tmp.as_file_mut().sync_all().map_err(write_error)?;
        tmp.persist(&target).map_err(|err| write_error(err.error))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
struct LastScan {
    folders: Vec<PathBuf>,
}

/// Folders covered by the last completed scan; `None` if there never was one.
pub(crate) fn load_last_scanned_folders(data_dir: &DataDir) -> Option<Vec<PathBuf>> {
    data_dir
        .read_ron::<LastScan>(LAST_SCAN_FILENAME)
        .map(|scan| scan.folders)
}

pub(crate) fn save_last_scanned_folders(
    data_dir: &DataDir,
    folders: &[PathBuf],
) -> Result<(), PersistError> {
    let scan = LastScan {
        folders: folders.to_vec(),
    };
    data_dir.write_ron(LAST_SCAN_FILENAME, &scan)?;
    Ok(())
}

/// True when the configured folders differ from what was last scanned.
/// Order does not matter.
pub(crate) fn folders_changed_since_last_scan(data_dir: &DataDir, folders: &[PathBuf]) -> bool {
    let Some(mut previous) = load_last_scanned_folders(data_dir) else {
        return true;
    };
    let mut current = folders.to_vec();
    previous.sort();
    current.sort();
    previous != current
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn data_dir(temp: &TempDir) -> DataDir {
        DataDir::open(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn opening_creates_nested_data_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("share/collection-indexer");
        let dir = DataDir::open(root.clone()).unwrap();
        assert_eq!(dir.path(), root.as_path());
        assert!(root.is_dir());
    }

    #[test]
    fn a_file_cannot_serve_as_data_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("collection-indexer");
        fs::write(&file, "not a directory").unwrap();
        assert!(matches!(
            DataDir::open(file),
            Err(PersistError::NotADirectory(_))
        ));
    }

    #[test]
    fn never_scanned_counts_as_changed() {
        let temp = TempDir::new().unwrap();
        let dir = data_dir(&temp);
        assert_eq!(load_last_scanned_folders(&dir), None);
        assert!(folders_changed_since_last_scan(&dir, &[]));
    }

    #[test]
    fn last_scan_round_trips_and_ignores_folder_order() {
        let temp = TempDir::new().unwrap();
        let dir = data_dir(&temp);
        let folders = vec![PathBuf::from("/music/b"), PathBuf::from("/music/a")];
        save_last_scanned_folders(&dir, &folders).unwrap();

        assert_eq!(load_last_scanned_folders(&dir), Some(folders));
        let reordered = vec![PathBuf::from("/music/a"), PathBuf::from("/music/b")];
        assert!(!folders_changed_since_last_scan(&dir, &reordered));
        assert!(folders_changed_since_last_scan(
            &dir,
            &[PathBuf::from("/music/a")]
        ));
    }

    #[test]
    fn newer_scan_replaces_older_one() {
        let temp = TempDir::new().unwrap();
        let dir = data_dir(&temp);
        save_last_scanned_folders(&dir, &[PathBuf::from("/old")]).unwrap();
        save_last_scanned_folders(&dir, &[PathBuf::from("/new")]).unwrap();

        assert_eq!(
            load_last_scanned_folders(&dir),
            Some(vec![PathBuf::from("/new")])
        );
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from(LAST_SCAN_FILENAME)]);
    }

    #[test]
    fn corrupt_last_scan_counts_as_changed() {
        let temp = TempDir::new().unwrap();
        let dir = data_dir(&temp);
        fs::write(temp.path().join(LAST_SCAN_FILENAME), "not ron at all (").unwrap();
        assert!(folders_changed_since_last_scan(&dir, &[]));
    }

    #[test]
    fn saving_into_a_vanished_data_dir_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");
        let dir = DataDir::open(root.clone()).unwrap();
        fs::remove_dir(&root).unwrap();

        let err = save_last_scanned_folders(&dir, &[PathBuf::from("/music")]).unwrap_err();
        assert!(matches!(err, PersistError::Write { .. }));
        assert!(!root.join(LAST_SCAN_FILENAME).exists());
    }
}
