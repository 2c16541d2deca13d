use crate::{ExchangeId, MediaId, MessageId, ObjectUrl, SelectedFile, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked the floating assistant button.
    WidgetToggled,
    /// User dismissed the assistant panel.
    WidgetClosed,
    /// User edited the message input.
    InputChanged(String),
    /// User pressed send (button or Enter).
    SendClicked { now: Timestamp },
    /// User picked one of the suggested questions.
    SuggestionClicked { index: usize, now: Timestamp },
    /// File picker returned a batch.
    FilesSelected(Vec<SelectedFile>),
    /// User removed a file from the staged list before sending.
    StagedFileRemoved(MediaId),
    /// Engine could not load the bytes behind a staged file.
    ObjectUrlFailed { url: ObjectUrl, reason: String },
    /// Engine finished composing the reply for an exchange.
    ReplyReady {
        exchange: ExchangeId,
        reply: String,
        now: Timestamp,
    },
    /// User clicked an attachment inside a message.
    AttachmentClicked { message: MessageId, media: MediaId },
    /// User closed the full-screen image viewer.
    ViewerClosed,
    /// User asked to save an attachment.
    DownloadClicked { message: MessageId, media: MediaId },
    /// The widget is being torn down; release everything it holds.
    Teardown { now: Timestamp },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
