/// Tracks whether the collection folders changed since the last scan started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FolderChangeTracker {
    dirty: bool,
}

impl FolderChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::FolderChangeTracker;

    #[test]
    fn starts_clean() {
        assert!(!FolderChangeTracker::new().is_dirty());
    }

    #[test]
    fn mark_is_idempotent_and_clear_resets() {
        let mut tracker = FolderChangeTracker::new();
        tracker.mark_dirty();
        tracker.mark_dirty();
        assert!(tracker.is_dirty());
        tracker.clear();
        assert!(!tracker.is_dirty());
    }
}
