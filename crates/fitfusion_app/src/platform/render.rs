//! Turns view snapshots into terminal lines.
//!
//! The terminal is append-only, so the renderer remembers what it already
//! printed and only emits what changed since the previous snapshot.

use chrono::{Local, TimeZone};
use fitfusion_core::{
    format_size, AppViewModel, MediaId, MediaKind, Message, Notification, NotificationLevel,
    Sender, Timestamp,
};

#[derive(Debug, Default)]
pub struct TerminalRenderer {
    open: bool,
    printed: usize,
    typing_shown: bool,
    staged: Vec<MediaId>,
    viewer: Option<MediaId>,
    suggestions_shown: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if !view.open {
            if self.open {
                lines.push("[assistant minimized; /open to continue]".to_string());
            }
            self.open = false;
            return lines;
        }
        if !self.open {
            lines.push("=== FitFusion Assistant (online) ===".to_string());
            self.open = true;
            self.suggestions_shown = false;
            self.printed = 0;
            self.typing_shown = false;
            self.staged.clear();
            self.viewer = None;
        }

        let settled = view.messages.iter().filter(|m| !m.is_typing).count();
        if settled < self.printed {
            // The conversation was reset underneath us.
            self.printed = 0;
        }
        for message in view.messages.iter().filter(|m| !m.is_typing).skip(self.printed) {
            lines.extend(message_lines(message));
        }
        self.printed = settled;

        let typing = view.is_typing();
        if typing && !self.typing_shown {
            lines.push("FitFusion is typing...".to_string());
        }
        self.typing_shown = typing;

        if !view.suggestions.is_empty() && !self.suggestions_shown {
            lines.push("Try asking (/suggest <n>):".to_string());
            for (i, suggestion) in view.suggestions.iter().enumerate() {
                lines.push(format!("  {}) {}", i + 1, suggestion));
            }
            self.suggestions_shown = true;
        }

        let staged: Vec<MediaId> = view.staged.iter().map(|file| file.id).collect();
        if staged != self.staged {
            if view.staged.is_empty() {
                // Sending moves staged files into the message; nothing to say.
                let sent = view
                    .messages
                    .iter()
                    .rev()
                    .find(|m| !m.is_typing)
                    .is_some_and(|m| !m.media.is_empty());
                if !sent {
                    lines.push("No files staged".to_string());
                }
            } else {
                lines.push("Staged for your next message:".to_string());
                for file in &view.staged {
                    lines.push(format!(
                        "  [{}] {} ({})",
                        file.id,
                        file.name,
                        format_size(file.size)
                    ));
                }
            }
            self.staged = staged;
        }

        let viewer = view.viewer.as_ref().map(|media| media.id);
        if viewer != self.viewer {
            match &view.viewer {
                Some(media) => lines.push(format!(
                    "Viewing {} ({}); /close-viewer to return",
                    media.name, media.url
                )),
                None => lines.push("Viewer closed".to_string()),
            }
            self.viewer = viewer;
        }

        lines
    }
}

pub fn notice_line(notice: &Notification) -> String {
    let tag = match notice.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    if notice.detail.is_empty() {
        format!("[{tag}] {}", notice.title)
    } else {
        format!("[{tag}] {}: {}", notice.title, notice.detail)
    }
}

fn message_lines(message: &Message) -> Vec<String> {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Assistant => "FitFusion",
    };
    let mut lines = Vec::with_capacity(1 + message.media.len());
    if !message.content.is_empty() || message.media.is_empty() {
        lines.push(format!(
            "[{}] {}: {}",
            clock(message.timestamp),
            who,
            message.content
        ));
    } else {
        lines.push(format!("[{}] {}:", clock(message.timestamp), who));
    }
    for media in &message.media {
        let kind = match media.kind {
            MediaKind::Image => "image",
            MediaKind::Document => "file",
        };
        lines.push(format!(
            "    {} {}/{}: {} ({})",
            kind,
            message.id,
            media.id,
            media.name,
            format_size(media.size)
        ));
    }
    lines
}

fn clock(timestamp: Timestamp) -> String {
    Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
