use crate::{
    build_job_descriptor, DeclineReason, Effect, IndexingSettings, JobDescriptor, Msg,
    OrchestratorState, RunTrigger,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: OrchestratorState, msg: Msg) -> (OrchestratorState, Vec<Effect>) {
    let effects = match msg {
        Msg::RunRequested { trigger, settings } => {
            match decide_run(&mut state, trigger, &settings) {
                Ok(job) => vec![Effect::DispatchJob(job)],
                Err(reason) => vec![Effect::Declined { reason }],
            }
        }
        Msg::FoldersChanged => {
            state.mark_folders_dirty();
            Vec::new()
        }
        Msg::WorkerMessage(message) => vec![Effect::RelayProgress(message)],
        Msg::WorkerExited => match state.finish_run() {
            Some(task) => vec![Effect::BroadcastFinished { task }],
            None => Vec::new(),
        },
        Msg::DispatchFailed => {
            state.finish_run();
            Vec::new()
        }
    };

    (state, effects)
}

/// Applies the run guards for one request. On `Ok` the state is already
/// marked running and the folder flag cleared; on `Err` it is untouched.
pub fn decide_run(
    state: &mut OrchestratorState,
    trigger: RunTrigger,
    settings: &IndexingSettings,
) -> Result<JobDescriptor, DeclineReason> {
    if trigger == RunTrigger::IfFoldersChanged && !state.folders_dirty() {
        return Err(DeclineReason::FoldersUnchanged);
    }
    // Single-flight: a second request is rejected, never queued.
    if let Some(running) = state.running_task() {
        return Err(DeclineReason::AlreadyIndexing { running });
    }

    let job = build_job_descriptor(trigger, settings);
    state.start_run(job.task());
    Ok(job)
}
