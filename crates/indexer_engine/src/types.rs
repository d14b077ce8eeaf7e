use std::io;
use std::path::PathBuf;

use indexer_core::ProgressMessage;
use thiserror::Error;

/// What travels from the worker back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerEvent {
    Message(ProgressMessage),
    /// The current job is over. Carries no status; every exit counts as done.
    Exited,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("worker channel closed")]
    Closed,
}

#[derive(Debug, Error)]
#[error("notification failed: {message}")]
pub struct NotifyError {
    message: String,
}

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("collection folder not readable: {path:?}: {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scan task aborted: {0}")]
    Aborted(String),
}
