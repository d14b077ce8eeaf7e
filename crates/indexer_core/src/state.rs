use crate::status::{OrchestratorStatus, Phase};
use crate::{FolderChangeTracker, TaskKind};

/// Run guard and dirty flag of one orchestrator. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrchestratorState {
    running: Option<TaskKind>,
    folders: FolderChangeTracker,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn running_task(&self) -> Option<TaskKind> {
        self.running
    }

    pub fn folders_dirty(&self) -> bool {
        self.folders.is_dirty()
    }

    pub fn view(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            phase: match self.running {
                Some(task) => Phase::Running(task),
                None => Phase::Idle,
            },
            folders_dirty: self.folders.is_dirty(),
        }
    }

    pub(crate) fn start_run(&mut self, task: TaskKind) {
        self.running = Some(task);
        self.folders.clear();
    }

    pub(crate) fn finish_run(&mut self) -> Option<TaskKind> {
        self.running.take()
    }

    pub(crate) fn mark_folders_dirty(&mut self) {
        self.folders.mark_dirty();
    }
}
