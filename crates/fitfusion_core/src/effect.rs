use std::path::PathBuf;

use crate::{ExchangeId, ObjectUrl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Compose a reply to `prompt` after the typing delay.
    ScheduleReply { exchange: ExchangeId, prompt: String },
    /// Stop a scheduled reply before it fires.
    CancelReply { exchange: ExchangeId },
    /// Load `source` and register it under `url`.
    AcquireObjectUrl { url: ObjectUrl, source: PathBuf },
    ReleaseObjectUrls { urls: Vec<ObjectUrl> },
    Download { url: ObjectUrl, file_name: String },
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Fire-and-forget toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub detail: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, detail)
    }

    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, detail)
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, detail)
    }

    fn new(level: NotificationLevel, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            detail: detail.into(),
        }
    }
}
