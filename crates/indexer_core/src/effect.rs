use crate::{JobDescriptor, ProgressMessage, TaskKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand a freshly built descriptor to the worker.
    DispatchJob(JobDescriptor),
    /// Forward one worker message to the notification sink.
    RelayProgress(ProgressMessage),
    /// Tell completion subscribers that the run of `task` is over.
    BroadcastFinished { task: TaskKind },
    /// A run request was turned down; nothing was dispatched.
    Declined { reason: DeclineReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    AlreadyIndexing { running: TaskKind },
    FoldersUnchanged,
}
