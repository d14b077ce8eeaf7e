use std::sync::{Arc, Mutex, PoisonError, Weak};

use indexer_core::{
    decide_run, update, DeclineReason, Effect, JobDescriptor, Msg, OrchestratorState,
    OrchestratorStatus, RunTrigger, TaskKind,
};
use indexer_logging::{indexer_debug, indexer_error, indexer_info, indexer_warn};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::{
    CompletionSignal, FoldersChanged, NotificationSink, ProgressRelay, RunFinished,
    SettingsProvider, SubscriptionId, WorkerChannel, WorkerEvent,
};

/// What became of a run request. Purely informational; requests never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Dispatched(TaskKind),
    Declined(DeclineReason),
    /// The worker side of the channel is gone; the run was rolled back.
    WorkerUnavailable,
}

/// Starts collection scans at most one at a time and fans out their progress
/// and completion.
///
/// Construction spawns the worker-event loop and the progress relay on the
/// current Tokio runtime; both stop once the orchestrator is dropped.
pub struct IndexingOrchestrator {
    state: Mutex<OrchestratorState>,
    jobs: UnboundedSender<JobDescriptor>,
    settings: Arc<dyn SettingsProvider>,
    relay: ProgressRelay,
    completion: CompletionSignal,
}

impl IndexingOrchestrator {
    pub fn new(
        channel: WorkerChannel,
        settings: Arc<dyn SettingsProvider>,
        sink: Arc<dyn NotificationSink>,
    ) -> Arc<Self> {
        let (jobs, events) = channel.into_parts();
        let orchestrator = Arc::new(Self {
            state: Mutex::new(OrchestratorState::new()),
            jobs,
            settings,
            relay: ProgressRelay::spawn(sink),
            completion: CompletionSignal::new(),
        });
        // The event receiver moves into this loop, so handlers are wired once.
        spawn_event_loop(Arc::downgrade(&orchestrator), events);
        orchestrator
    }

    /// Periodic refresh of whatever is out of date.
    pub fn run_if_outdated(&self) -> RunOutcome {
        self.request(RunTrigger::IfOutdated)
    }

    /// Full refresh, but only if the folders changed since the last dispatch.
    pub fn run_if_folders_changed(&self) -> RunOutcome {
        self.request(RunTrigger::IfFoldersChanged)
    }

    /// Full refresh regardless of the folder flag.
    pub fn run_always(&self) -> RunOutcome {
        self.request(RunTrigger::Always)
    }

    pub fn run_album_artwork_only(&self, only_when_no_cover: bool) -> RunOutcome {
        self.request(RunTrigger::AlbumArtworkOnly { only_when_no_cover })
    }

    pub fn mark_folders_changed(&self) {
        self.apply(Msg::FoldersChanged);
    }

    /// Marks the folders dirty on every event from `source`.
    pub fn watch_folder_changes(
        self: &Arc<Self>,
        mut source: broadcast::Receiver<FoldersChanged>,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(FoldersChanged) => {}
                    Err(RecvError::Lagged(missed)) => {
                        indexer_debug!("folder change stream lagged by {} events", missed);
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(orchestrator) = weak.upgrade() else {
                    break;
                };
                orchestrator.mark_folders_changed();
            }
        })
    }

    pub fn on_finished<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RunFinished) + Send + Sync + 'static,
    {
        self.completion.on_finished(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.completion.unsubscribe(id)
    }

    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }

    pub fn folders_dirty(&self) -> bool {
        self.lock_state().folders_dirty()
    }

    pub fn status(&self) -> OrchestratorStatus {
        self.lock_state().view()
    }

    /// Drops this handle and waits until the relay has handed every queued
    /// progress message to the sink. Resolves once no other strong handle
    /// to the orchestrator remains.
    pub async fn shutdown(self: Arc<Self>) {
        let relay_task = self.relay.take_task();
        drop(self);
        if let Some(task) = relay_task {
            if let Err(err) = task.await {
                indexer_error!("progress relay task failed: {}", err);
            }
        }
    }

    fn request(&self, trigger: RunTrigger) -> RunOutcome {
        let settings = self.settings.indexing_settings();
        let decision = decide_run(&mut self.lock_state(), trigger, &settings);
        match decision {
            Ok(job) => self.send_job(job),
            Err(reason) => {
                log_decline(reason);
                RunOutcome::Declined(reason)
            }
        }
    }

    fn handle_worker_event(&self, event: WorkerEvent) {
        let msg = match event {
            WorkerEvent::Message(message) => Msg::WorkerMessage(message),
            WorkerEvent::Exited => {
                if !self.is_running() {
                    indexer_warn!("worker exit received while idle; ignoring");
                }
                Msg::WorkerExited
            }
        };
        let effects = self.apply(msg);
        self.run_effects(effects);
    }

    /// Runs the pure update under the state lock. Check-then-set of the run
    /// guard happens entirely inside this call.
    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock_state();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        effects
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DispatchJob(job) => {
                    self.send_job(job);
                }
                Effect::Declined { reason } => log_decline(reason),
                Effect::RelayProgress(message) => self.relay.relay(message),
                Effect::BroadcastFinished { task } => {
                    let notified = self.completion.broadcast(RunFinished { task });
                    indexer_info!("indexing finished task={} subscribers={}", task, notified);
                }
            }
        }
    }

    fn send_job(&self, job: JobDescriptor) -> RunOutcome {
        let task = job.task();
        if self.jobs.send(job).is_err() {
            indexer_error!("worker unavailable; task={} not started", task);
            self.apply(Msg::DispatchFailed);
            return RunOutcome::WorkerUnavailable;
        }
        indexer_info!("indexing started task={}", task);
        RunOutcome::Dispatched(task)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_decline(reason: DeclineReason) {
    match reason {
        DeclineReason::AlreadyIndexing { running } => {
            indexer_info!("already indexing (task={}), request skipped", running);
        }
        DeclineReason::FoldersUnchanged => {
            indexer_info!("folders unchanged since last scan, nothing to index");
        }
    }
}

fn spawn_event_loop(
    orchestrator: Weak<IndexingOrchestrator>,
    mut events: UnboundedReceiver<WorkerEvent>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(orchestrator) = orchestrator.upgrade() else {
                break;
            };
            orchestrator.handle_worker_event(event);
        }
        indexer_debug!("worker event stream closed");
    });
}
