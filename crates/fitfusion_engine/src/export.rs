use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fitfusion_core::Message;
use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub path: PathBuf,
    pub message_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode transcript: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

pub fn transcript_filename(exported_at: DateTime<Utc>) -> String {
    format!("transcript-{}.json", exported_at.format("%Y%m%dT%H%M%SZ"))
}

/// Writes the conversation as pretty JSON. Typing placeholders are skipped.
pub fn export_transcript(
    writer: &AtomicFileWriter,
    messages: &[Message],
    exported_at: DateTime<Utc>,
) -> Result<TranscriptSummary, ExportError> {
    let messages: Vec<&Message> = messages.iter().filter(|m| !m.is_typing).collect();
    let document = json!({
        "exported_utc": exported_at.to_rfc3339(),
        "message_count": messages.len(),
        "messages": messages,
    });
    let content = serde_json::to_string_pretty(&document)?;
    let path = writer.write(&transcript_filename(exported_at), content)?;

    Ok(TranscriptSummary {
        path,
        message_count: messages.len(),
    })
}
