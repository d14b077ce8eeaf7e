use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::FutureExt;
use indexer_core::ProgressMessage;
use indexer_logging::{indexer_debug, indexer_error, indexer_warn};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use crate::NotifyError;

/// User-facing progress notifications. Rendering is up to the implementor.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn refreshing(&self) -> Result<(), NotifyError>;
    async fn added_tracks(&self, count: u64, percentage: f64) -> Result<(), NotifyError>;
    async fn removing_tracks(&self) -> Result<(), NotifyError>;
    async fn updating_tracks(&self) -> Result<(), NotifyError>;
    async fn updating_album_artwork(&self) -> Result<(), NotifyError>;
    async fn dismiss_delayed(&self) -> Result<(), NotifyError>;
}

/// Forwards worker messages to a [`NotificationSink`] from one detached task.
///
/// `relay` never blocks and never fails; messages reach the sink in the order
/// they were relayed. The task ends after the relay is dropped and the queue
/// has drained.
#[derive(Debug)]
pub struct ProgressRelay {
    tx: UnboundedSender<ProgressMessage>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressRelay {
    /// Spawns the delivery task on the current Tokio runtime.
    pub fn spawn(sink: Arc<dyn NotificationSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressMessage>();
        let task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                deliver(sink.as_ref(), message).await;
            }
            indexer_debug!("progress relay stopped");
        });
        Self {
            tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Handle of the delivery task, for awaiting the drain. Yields `Some` once.
    pub fn take_task(&self) -> Option<JoinHandle<()>> {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn relay(&self, message: ProgressMessage) {
        if self.tx.send(message).is_err() {
            indexer_warn!("progress relay gone; dropping {}", message.label());
        }
    }
}

/// Delivers one message, logging (not returning) any sink failure or panic.
pub async fn deliver(sink: &dyn NotificationSink, message: ProgressMessage) {
    let label = message.label();
    match AssertUnwindSafe(notify(sink, message)).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => indexer_error!("relaying {} failed: {}", label, err),
        Err(_) => indexer_error!("notification sink panicked while relaying {}", label),
    }
}

async fn notify(sink: &dyn NotificationSink, message: ProgressMessage) -> Result<(), NotifyError> {
    match message {
        ProgressMessage::Refreshing => sink.refreshing().await,
        ProgressMessage::AddingTracks {
            added_count,
            percentage,
        } => sink.added_tracks(added_count, percentage).await,
        ProgressMessage::RemovingTracks => sink.removing_tracks().await,
        ProgressMessage::UpdatingTracks => sink.updating_tracks().await,
        ProgressMessage::UpdatingAlbumArtwork => sink.updating_album_artwork().await,
        ProgressMessage::Dismiss => sink.dismiss_delayed().await,
        ProgressMessage::Unknown => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl Calls {
        fn push(&self, call: impl Into<String>) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(call.into());
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl NotificationSink for Calls {
        async fn refreshing(&self) -> Result<(), NotifyError> {
            self.push("refreshing")
        }
        async fn added_tracks(&self, count: u64, percentage: f64) -> Result<(), NotifyError> {
            self.push(format!("added_tracks({count}, {percentage})"))
        }
        async fn removing_tracks(&self) -> Result<(), NotifyError> {
            self.push("removing_tracks")
        }
        async fn updating_tracks(&self) -> Result<(), NotifyError> {
            self.push("updating_tracks")
        }
        async fn updating_album_artwork(&self) -> Result<(), NotifyError> {
            self.push("updating_album_artwork")
        }
        async fn dismiss_delayed(&self) -> Result<(), NotifyError> {
            self.push("dismiss_delayed")
        }
    }

    #[tokio::test]
    async fn each_tag_maps_to_one_sink_call() {
        let sink = Calls::default();
        for message in [
            ProgressMessage::Refreshing,
            ProgressMessage::AddingTracks {
                added_count: 3,
                percentage: 42.5,
            },
            ProgressMessage::RemovingTracks,
            ProgressMessage::UpdatingTracks,
            ProgressMessage::UpdatingAlbumArtwork,
            ProgressMessage::Dismiss,
        ] {
            deliver(&sink, message).await;
        }

        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![
                "refreshing",
                "added_tracks(3, 42.5)",
                "removing_tracks",
                "updating_tracks",
                "updating_album_artwork",
                "dismiss_delayed",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_messages_are_ignored() {
        let sink = Calls::default();
        deliver(&sink, ProgressMessage::Unknown).await;
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
