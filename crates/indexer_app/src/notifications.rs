use async_trait::async_trait;
use indexer_engine::{NotificationSink, NotifyError};
use indexer_logging::indexer_info;

/// Renders progress notifications as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn refreshing(&self) -> Result<(), NotifyError> {
        indexer_info!("Refreshing collection");
        Ok(())
    }

    async fn added_tracks(&self, count: u64, percentage: f64) -> Result<(), NotifyError> {
        indexer_info!("Added {} tracks ({:.0}%)", count, percentage);
        Ok(())
    }

    async fn removing_tracks(&self) -> Result<(), NotifyError> {
        indexer_info!("Removing tracks");
        Ok(())
    }

    async fn updating_tracks(&self) -> Result<(), NotifyError> {
        indexer_info!("Updating tracks");
        Ok(())
    }

    async fn updating_album_artwork(&self) -> Result<(), NotifyError> {
        indexer_info!("Updating album artwork");
        Ok(())
    }

    async fn dismiss_delayed(&self) -> Result<(), NotifyError> {
        indexer_info!("Done");
        Ok(())
    }
}
