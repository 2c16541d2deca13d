use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::conversation::{MediaId, MediaItem};

/// Per-file ceiling for attachments.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

const OBJECT_URL_PREFIX: &str = "blob:fitfusion/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_ascii_lowercase().starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Document
        }
    }
}

/// Opaque handle to bytes held by the engine's object-URL registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn for_media(id: MediaId) -> Self {
        Self(format!("{OBJECT_URL_PREFIX}{id}"))
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file picked by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub source: PathBuf,
}

/// A validated file waiting to be sent. Owns its object URL until sent or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub id: MediaId,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub kind: MediaKind,
    pub url: ObjectUrl,
}

impl From<StagedFile> for MediaItem {
    fn from(file: StagedFile) -> Self {
        MediaItem {
            id: file.id,
            kind: file.kind,
            url: file.url,
            name: file.name,
            size: file.size,
            mime: file.mime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    TooLarge { name: String, size: u64, max: u64 },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::TooLarge { name, max, .. } => {
                write!(f, "{name} exceeds the {} limit", format_size(*max))
            }
        }
    }
}

impl std::error::Error for AttachmentError {}

/// Rejects the whole batch if any file is over `max_bytes`.
pub fn validate_batch(files: &[SelectedFile], max_bytes: u64) -> Result<(), AttachmentError> {
    match files.iter().find(|file| file.size > max_bytes) {
        Some(file) => Err(AttachmentError::TooLarge {
            name: file.name.clone(),
            size: file.size,
            max: max_bytes,
        }),
        None => Ok(()),
    }
}

/// Human-readable byte size, e.g. `5 MB` or `812.4 KB`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        trim_fraction(value / MB, "MB")
    } else if value >= KB {
        trim_fraction(value / KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn trim_fraction(value: f64, unit: &str) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0} {unit}")
    } else {
        format!("{value:.1} {unit}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagedFiles {
    files: Vec<StagedFile>,
}

impl StagedFiles {
    pub fn stage(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    pub fn remove(&mut self, id: MediaId) -> Option<StagedFile> {
        let index = self.files.iter().position(|file| file.id == id)?;
        Some(self.files.remove(index))
    }

    pub fn remove_by_url(&mut self, url: &ObjectUrl) -> Option<StagedFile> {
        let index = self.files.iter().position(|file| &file.url == url)?;
        Some(self.files.remove(index))
    }

    pub fn take_all(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.files)
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn urls(&self) -> Vec<ObjectUrl> {
        self.files.iter().map(|file| file.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
