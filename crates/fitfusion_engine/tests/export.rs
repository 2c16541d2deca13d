use std::fs;

use chrono::{TimeZone, Utc};
use fitfusion_core::{MediaItem, MediaKind, Message, ObjectUrl, Sender};
use fitfusion_engine::{export_transcript, transcript_filename, AtomicFileWriter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn message(id: u64, sender: Sender, content: &str) -> Message {
    Message {
        id,
        content: content.to_string(),
        sender,
        timestamp: 1_714_548_600_000 + id as i64,
        is_typing: false,
        media: Vec::new(),
    }
}

#[test]
fn filename_uses_compact_utc_stamp() {
    let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 5).unwrap();
    assert_eq!(transcript_filename(at), "transcript-20241231T235905Z.json");
}

#[test]
fn export_writes_messages_with_media() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));
    let mut user = message(2, Sender::User, "");
    user.media.push(MediaItem {
        id: 1,
        kind: MediaKind::Image,
        url: ObjectUrl::for_media(1),
        name: "squat.png".to_string(),
        size: 2_048,
        mime: "image/png".to_string(),
    });
    let messages = vec![
        message(1, Sender::Assistant, "Welcome"),
        user,
        message(3, Sender::Assistant, "Nice form"),
    ];
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();

    let summary = export_transcript(&writer, &messages, at).unwrap();

    assert_eq!(summary.message_count, 3);
    assert_eq!(summary.path, temp.path().join("out").join(transcript_filename(at)));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.path).unwrap()).unwrap();
    assert_eq!(json["exported_utc"], "2024-05-01T07:30:00+00:00");
    assert_eq!(json["messages"][1]["sender"], "user");
    assert_eq!(json["messages"][1]["media"][0]["name"], "squat.png");
    assert_eq!(json["messages"][2]["content"], "Nice form");
    assert!(json["messages"][0].get("is_typing").is_none());
}

#[test]
fn empty_conversation_still_exports() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();

    let summary = export_transcript(&writer, &[], at).unwrap();

    assert_eq!(summary.message_count, 0);
    assert!(summary.path.exists());
}
