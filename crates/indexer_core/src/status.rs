use crate::TaskKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running(TaskKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrchestratorStatus {
    pub phase: Phase,
    pub folders_dirty: bool,
}

impl OrchestratorStatus {
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }
}
