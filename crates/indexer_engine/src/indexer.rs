use indexer_core::{JobDescriptor, ProgressMessage};
use tokio::sync::mpsc::UnboundedSender;

use crate::{IndexError, WorkerEvent};

pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: ProgressMessage);
}

pub struct ChannelProgressReporter {
    tx: UnboundedSender<WorkerEvent>,
}

impl ChannelProgressReporter {
    pub fn new(tx: UnboundedSender<WorkerEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn report(&self, message: ProgressMessage) {
        let _ = self.tx.send(WorkerEvent::Message(message));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSummary {
    pub discovered_tracks: u64,
}

/// The scanning work itself. Runs on the worker thread, one job at a time.
#[async_trait::async_trait]
pub trait Indexer: Send + Sync {
    async fn index(
        &self,
        job: &JobDescriptor,
        progress: &dyn ProgressReporter,
    ) -> Result<IndexSummary, IndexError>;
}
