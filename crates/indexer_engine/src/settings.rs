use std::sync::{PoisonError, RwLock};

use indexer_core::IndexingSettings;

/// Read-only view of the settings store, consulted once per dispatch.
pub trait SettingsProvider: Send + Sync {
    fn indexing_settings(&self) -> IndexingSettings;
}

/// In-memory settings whose values can change between runs.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<IndexingSettings>,
}

impl SharedSettings {
    pub fn new(settings: IndexingSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    pub fn modify(&self, change: impl FnOnce(&mut IndexingSettings)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        change(&mut guard);
    }
}

impl SettingsProvider for SharedSettings {
    fn indexing_settings(&self) -> IndexingSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let settings = SharedSettings::default();
        let before = settings.indexing_settings();
        settings.modify(|s| s.download_missing_album_covers = true);

        assert!(!before.download_missing_album_covers);
        assert!(settings.indexing_settings().download_missing_album_covers);
    }
}
