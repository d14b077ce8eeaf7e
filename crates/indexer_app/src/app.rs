use std::sync::Arc;

use anyhow::Context;
use indexer_engine::{
    worker_channel, FolderScanIndexer, IndexingOrchestrator, RunOutcome, SharedSettings,
    TaskKind, WorkerHandle,
};
use indexer_logging::{indexer_error, indexer_info, indexer_warn};
use tokio::sync::mpsc;

use crate::cli::{Args, Trigger};
use crate::notifications::LogNotificationSink;
use crate::{logging, persistence, settings};

pub async fn run(args: Args) -> anyhow::Result<()> {
    let data_dir = settings::resolve_data_dir(args.data_dir.as_deref())?;
    logging::initialize(args.log, data_dir.path());

    let config = settings::load_config(&data_dir);
    if config.folders.is_empty() {
        indexer_warn!("No collection folders configured in {:?}", data_dir.path());
    }

    let (channel, endpoint) = worker_channel();
    let worker = WorkerHandle::spawn(
        endpoint,
        Arc::new(FolderScanIndexer::new(config.folders.clone())),
    )
    .context("starting indexing worker")?;
    let orchestrator = IndexingOrchestrator::new(
        channel,
        Arc::new(SharedSettings::new(config.indexing_settings(data_dir.path()))),
        Arc::new(LogNotificationSink),
    );

    if persistence::folders_changed_since_last_scan(&data_dir, &config.folders) {
        indexer_info!("Collection folders changed since the last scan");
        orchestrator.mark_folders_changed();
    }

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    orchestrator.on_finished(move |finished| {
        let _ = done_tx.send(*finished);
    });

    let outcome = match args.trigger {
        Trigger::Outdated => orchestrator.run_if_outdated(),
        Trigger::FoldersChanged => orchestrator.run_if_folders_changed(),
        Trigger::Always => orchestrator.run_always(),
        Trigger::AlbumArtwork => orchestrator.run_album_artwork_only(args.only_when_no_cover),
    };

    match outcome {
        RunOutcome::Dispatched(task) => {
            indexer_info!("Waiting for {} scan to finish (Ctrl-C to abandon)", task);
            tokio::select! {
                finished = done_rx.recv() => {
                    if let Some(finished) = finished {
                        if finished.task != TaskKind::AlbumArtworkOnly {
                            if let Err(err) =
                                persistence::save_last_scanned_folders(&data_dir, &config.folders)
                            {
                                indexer_error!("Failed to record the last scan: {}", err);
                            }
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    indexer_warn!("Interrupted; the worker is left to finish on its own");
                    return Ok(());
                }
            }
        }
        RunOutcome::Declined(reason) => indexer_info!("No scan started: {:?}", reason),
        RunOutcome::WorkerUnavailable => anyhow::bail!("indexing worker is not running"),
    }

    // Lets queued progress reach the sink before the runtime goes away.
    orchestrator.shutdown().await;
    tokio::task::spawn_blocking(move || worker.join())
        .await
        .context("waiting for indexing worker")?;
    Ok(())
}
