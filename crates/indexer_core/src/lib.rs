//! Indexer core: pure orchestration state machine and worker protocol types.
mod effect;
mod folders;
mod job;
mod msg;
mod progress;
mod state;
mod status;
mod update;

pub use effect::{DeclineReason, Effect};
pub use folders::FolderChangeTracker;
pub use job::{build_job_descriptor, IndexingSettings, JobDescriptor, RunTrigger, TaskKind};
pub use msg::Msg;
pub use progress::ProgressMessage;
pub use state::OrchestratorState;
pub use status::{OrchestratorStatus, Phase};
pub use update::{decide_run, update};
