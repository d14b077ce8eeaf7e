use std::path::PathBuf;

use indexer_core::{
    build_job_descriptor, IndexingSettings, JobDescriptor, ProgressMessage, RunTrigger,
};
use serde_json::json;

fn settings() -> IndexingSettings {
    IndexingSettings {
        skip_removed_files_during_refresh: false,
        download_missing_album_covers: true,
        application_data_directory: PathBuf::from("/home/me/.local/share/indexer"),
    }
}

#[test]
fn descriptor_serializes_as_flat_record() {
    let job = build_job_descriptor(
        RunTrigger::AlbumArtworkOnly {
            only_when_no_cover: true,
        },
        &settings(),
    );
    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(
        value,
        json!({
            "task": "albumArtwork",
            "skipRemovedFilesDuringRefresh": false,
            "downloadMissingAlbumCovers": true,
            "applicationDataDirectory": "/home/me/.local/share/indexer",
            "onlyWhenHasNoCover": true,
        })
    );
}

#[test]
fn task_names_match_protocol() {
    for (trigger, expected) in [
        (RunTrigger::IfOutdated, "outdated"),
        (RunTrigger::Always, "always"),
        (RunTrigger::IfFoldersChanged, "always"),
    ] {
        let value = serde_json::to_value(build_job_descriptor(trigger, &settings())).unwrap();
        assert_eq!(value["task"], expected);
        assert_eq!(value["onlyWhenHasNoCover"], false);
    }
}

#[test]
fn worker_side_can_read_descriptor_back() {
    let raw = r#"{"task":"outdated","skipRemovedFilesDuringRefresh":true,
        "downloadMissingAlbumCovers":false,"applicationDataDirectory":"/tmp/x",
        "onlyWhenHasNoCover":false}"#;
    let job: JobDescriptor = serde_json::from_str(raw).unwrap();
    assert_eq!(job.task().as_str(), "outdated");
    assert!(job.skip_removed_files_during_refresh());
}

#[test]
fn adding_tracks_uses_protocol_field_names() {
    let message: ProgressMessage = serde_json::from_str(
        r#"{"type":"addingTracks","numberOfAddedTracks":12,"percentageOfAddedTracks":37.5}"#,
    )
    .unwrap();
    assert_eq!(
        message,
        ProgressMessage::AddingTracks {
            added_count: 12,
            percentage: 37.5
        }
    );
}

#[test]
fn unit_messages_decode_from_type_tag() {
    for (tag, expected) in [
        ("refreshing", ProgressMessage::Refreshing),
        ("removingTracks", ProgressMessage::RemovingTracks),
        ("updatingTracks", ProgressMessage::UpdatingTracks),
        ("updatingAlbumArtwork", ProgressMessage::UpdatingAlbumArtwork),
        ("dismiss", ProgressMessage::Dismiss),
    ] {
        let message: ProgressMessage =
            serde_json::from_value(json!({ "type": tag })).unwrap();
        assert_eq!(message, expected);
        assert_eq!(message.label(), tag);
    }
}

#[test]
fn unrecognised_tag_decodes_to_unknown() {
    let message: ProgressMessage =
        serde_json::from_value(json!({ "type": "defragmenting" })).unwrap();
    assert_eq!(message, ProgressMessage::Unknown);
}
