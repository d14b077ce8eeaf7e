#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A caller asked for a run, with the settings current at that moment.
    RunRequested {
        trigger: crate::RunTrigger,
        settings: crate::IndexingSettings,
    },
    /// The folder set changed (add, remove, visibility).
    FoldersChanged,
    /// The worker reported progress.
    WorkerMessage(crate::ProgressMessage),
    /// The worker finished its job, for whatever reason.
    WorkerExited,
    /// The descriptor never reached the worker.
    DispatchFailed,
}
