use std::io;
use std::sync::Arc;
use std::thread;

use indexer_core::JobDescriptor;
use indexer_logging::{indexer_debug, indexer_error, indexer_info, indexer_warn};

use crate::{Indexer, ProgressReporter, WorkerEndpoint};

const WORKER_THREAD_NAME: &str = "collection-indexer";

/// Owns the isolated worker thread.
pub struct WorkerHandle {
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    /// Starts the worker. It runs one job per descriptor received on
    /// `endpoint` and stops once the orchestrator side is dropped.
    pub fn spawn(endpoint: WorkerEndpoint, indexer: Arc<dyn Indexer>) -> io::Result<Self> {
        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(endpoint, indexer))?;
        Ok(Self { thread })
    }

    /// Waits for the worker thread to stop.
    pub fn join(self) {
        if self.thread.join().is_err() {
            indexer_error!("worker thread panicked");
        }
    }
}

fn run_worker(mut endpoint: WorkerEndpoint, indexer: Arc<dyn Indexer>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            indexer_error!("worker could not start its runtime: {}", err);
            return;
        }
    };

    while let Some(job) = endpoint.blocking_next_job() {
        let reporter = endpoint.reporter();
        runtime.block_on(run_job(indexer.as_ref(), &job, &reporter));
        // Exit is sent whatever the outcome; the protocol has no failure status.
        if endpoint.exit().is_err() {
            indexer_debug!("orchestrator gone; worker stopping");
            break;
        }
    }
    indexer_debug!("worker job stream closed");
}

async fn run_job(indexer: &dyn Indexer, job: &JobDescriptor, reporter: &dyn ProgressReporter) {
    indexer_info!(
        "worker starting task={} data_dir={:?}",
        job.task(),
        job.application_data_directory()
    );
    match indexer.index(job, reporter).await {
        Ok(summary) => indexer_info!(
            "worker finished task={} discovered_tracks={}",
            job.task(),
            summary.discovered_tracks
        ),
        Err(err) => indexer_warn!("worker task={} failed: {}", job.task(), err),
    }
}
