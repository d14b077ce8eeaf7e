//! Indexer engine: worker channel, worker thread and the orchestrator that drives them.
mod channel;
mod completion;
mod folders;
mod indexer;
mod orchestrator;
mod relay;
mod scan;
mod settings;
mod types;
mod worker;

pub use channel::{worker_channel, WorkerChannel, WorkerEndpoint};
pub use completion::{CompletionSignal, RunFinished, SubscriptionId};
pub use folders::{FolderEvents, FoldersChanged};
pub use indexer::{ChannelProgressReporter, IndexSummary, Indexer, ProgressReporter};
pub use orchestrator::{IndexingOrchestrator, RunOutcome};
pub use relay::{deliver, NotificationSink, ProgressRelay};
pub use scan::{FolderScanIndexer, AUDIO_EXTENSIONS};
pub use settings::{SettingsProvider, SharedSettings};
pub use types::{ChannelError, IndexError, NotifyError, WorkerEvent};
pub use worker::WorkerHandle;

pub use indexer_core::{
    build_job_descriptor, DeclineReason, IndexingSettings, JobDescriptor, OrchestratorStatus,
    Phase, ProgressMessage, RunTrigger, TaskKind,
};
