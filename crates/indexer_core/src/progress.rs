use serde::{Deserialize, Serialize};

/// One status report emitted by the worker during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressMessage {
    Refreshing,
    AddingTracks {
        #[serde(rename = "numberOfAddedTracks")]
        added_count: u64,
        #[serde(rename = "percentageOfAddedTracks")]
        percentage: f64,
    },
    RemovingTracks,
    UpdatingTracks,
    UpdatingAlbumArtwork,
    Dismiss,
    /// Anything the protocol does not know about.
    #[serde(other)]
    Unknown,
}

impl ProgressMessage {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressMessage::Refreshing => "refreshing",
            ProgressMessage::AddingTracks { .. } => "addingTracks",
            ProgressMessage::RemovingTracks => "removingTracks",
            ProgressMessage::UpdatingTracks => "updatingTracks",
            ProgressMessage::UpdatingAlbumArtwork => "updatingAlbumArtwork",
            ProgressMessage::Dismiss => "dismiss",
            ProgressMessage::Unknown => "unknown",
        }
    }
}
