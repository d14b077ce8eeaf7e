use std::path::{Path, PathBuf};

use anyhow::Context;
use indexer_core::IndexingSettings;
use indexer_logging::indexer_info;
use serde::{Deserialize, Serialize};

use crate::persistence::DataDir;

const SETTINGS_FILENAME: &str = "settings.ron";
const DATA_DIR_NAME: &str = "collection-indexer";

/// Contents of `settings.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub folders: Vec<PathBuf>,
    pub skip_removed_files_during_refresh: bool,
    pub download_missing_album_covers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            skip_removed_files_during_refresh: true,
            download_missing_album_covers: false,
        }
    }
}

impl AppConfig {
    pub fn indexing_settings(&self, data_dir: &Path) -> IndexingSettings {
        IndexingSettings {
            skip_removed_files_during_refresh: self.skip_removed_files_during_refresh,
            download_missing_album_covers: self.download_missing_album_covers,
            application_data_directory: data_dir.to_path_buf(),
        }
    }
}

/// Picks the data directory and makes sure it exists.
pub fn resolve_data_dir(explicit: Option<&Path>) -> anyhow::Result<DataDir> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_dir()
            .map(|base| base.join(DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(format!(".{DATA_DIR_NAME}"))),
    };
    let display = dir.display().to_string();
    DataDir::open(dir).with_context(|| format!("preparing data directory {display}"))
}

/// Missing file means defaults; a broken file is reported and ignored.
pub fn load_config(data_dir: &DataDir) -> AppConfig {
    match data_dir.read_ron::<AppConfig>(SETTINGS_FILENAME) {
        Some(config) => {
            let path = data_dir.path().join(SETTINGS_FILENAME);
            indexer_info!("Loaded settings from {:?}", path);
            config
        }
        None => AppConfig::default(),
    }
}
