use tokio::sync::broadcast;

const FOLDER_EVENT_CAPACITY: usize = 16;

/// Emitted once per folder-set mutation. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldersChanged;

/// Source of "folders changed" events, raised by whoever manages the folder list.
#[derive(Debug, Clone)]
pub struct FolderEvents {
    tx: broadcast::Sender<FoldersChanged>,
}

impl FolderEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FOLDER_EVENT_CAPACITY);
        Self { tx }
    }

    /// Returns how many subscribers saw the event.
    pub fn notify_changed(&self) -> usize {
        self.tx.send(FoldersChanged).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FoldersChanged> {
        self.tx.subscribe()
    }
}

impl Default for FolderEvents {
    fn default() -> Self {
        Self::new()
    }
}
