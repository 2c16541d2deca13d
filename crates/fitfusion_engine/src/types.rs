use std::path::PathBuf;
use std::sync::mpsc;

use fitfusion_core::{ExchangeId, ObjectUrl};

use crate::app_update::UpdateEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ReplyReady {
        exchange: ExchangeId,
        reply: String,
    },
    ObjectUrlFailed {
        url: ObjectUrl,
        reason: String,
    },
    Downloaded {
        file_name: String,
        path: PathBuf,
    },
    TranscriptExported {
        path: PathBuf,
        message_count: usize,
    },
    Update(UpdateEvent),
    /// An external operation failed; surfaced once, never retried.
    Failed {
        operation: &'static str,
        message: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
