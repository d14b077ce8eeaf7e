use indexer_core::{JobDescriptor, ProgressMessage};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{ChannelError, ChannelProgressReporter, WorkerEvent};

/// Creates a connected pair: the orchestrator's side and the worker's side.
pub fn worker_channel() -> (WorkerChannel, WorkerEndpoint) {
    let (job_tx, job_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        WorkerChannel { job_tx, event_rx },
        WorkerEndpoint { job_rx, event_tx },
    )
}

/// Controller side of the worker channel.
///
/// The event receiver is moved out exactly once, when an orchestrator is
/// built on top of this channel.
#[derive(Debug)]
pub struct WorkerChannel {
    job_tx: UnboundedSender<JobDescriptor>,
    event_rx: UnboundedReceiver<WorkerEvent>,
}

impl WorkerChannel {
    pub fn send(&self, job: JobDescriptor) -> Result<(), ChannelError> {
        self.job_tx.send(job).map_err(|_| ChannelError::Closed)
    }

    /// Next event from the worker. `None` once the worker side is dropped.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        self.event_rx.recv().await
    }

    pub(crate) fn into_parts(
        self,
    ) -> (UnboundedSender<JobDescriptor>, UnboundedReceiver<WorkerEvent>) {
        (self.job_tx, self.event_rx)
    }
}

/// Worker side of the worker channel.
#[derive(Debug)]
pub struct WorkerEndpoint {
    job_rx: UnboundedReceiver<JobDescriptor>,
    event_tx: UnboundedSender<WorkerEvent>,
}

impl WorkerEndpoint {
    /// Waits for the next job. `None` once the orchestrator is gone.
    pub async fn next_job(&mut self) -> Option<JobDescriptor> {
        self.job_rx.recv().await
    }

    /// Blocking variant for plain threads. Must not be called from async code.
    pub fn blocking_next_job(&mut self) -> Option<JobDescriptor> {
        self.job_rx.blocking_recv()
    }

    pub fn try_next_job(&mut self) -> Option<JobDescriptor> {
        self.job_rx.try_recv().ok()
    }

    pub fn emit(&self, message: ProgressMessage) -> Result<(), ChannelError> {
        self.event_tx
            .send(WorkerEvent::Message(message))
            .map_err(|_| ChannelError::Closed)
    }

    pub fn exit(&self) -> Result<(), ChannelError> {
        self.event_tx
            .send(WorkerEvent::Exited)
            .map_err(|_| ChannelError::Closed)
    }

    pub fn reporter(&self) -> ChannelProgressReporter {
        ChannelProgressReporter::new(self.event_tx.clone())
    }
}
