use fit_logging::{fit_debug, fit_info};

use crate::attachments::{format_size, validate_batch, MediaKind, SelectedFile};
use crate::{AppState, Effect, Msg, Notification, Timestamp};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::WidgetToggled => {
            let open = !state.is_open();
            state.set_open(open);
            Vec::new()
        }
        Msg::WidgetClosed => {
            state.set_open(false);
            Vec::new()
        }
        Msg::InputChanged(text) => {
            // Input is disabled while a reply is pending.
            if !state.is_awaiting() {
                state.set_input(text);
            }
            Vec::new()
        }
        Msg::SendClicked { now } => send(&mut state, now),
        Msg::SuggestionClicked { index, now } => {
            if state.is_awaiting() {
                return (state, Vec::new());
            }
            match state.config().suggestions.get(index).cloned() {
                Some(question) => {
                    state.set_input(question);
                    send(&mut state, now)
                }
                None => Vec::new(),
            }
        }
        Msg::FilesSelected(files) => select_files(&mut state, files),
        Msg::StagedFileRemoved(id) => match state.unstage(id) {
            Some(file) => vec![Effect::ReleaseObjectUrls {
                urls: vec![file.url],
            }],
            None => Vec::new(),
        },
        Msg::ObjectUrlFailed { url, reason } => {
            // The file may already have been sent before the failure arrived.
            let name = match state.unstage_url(&url) {
                Some(file) => Some(file.name),
                None => state.drop_sent_media(&url).map(|item| item.name),
            };
            match name {
                Some(name) => vec![Effect::Notify(Notification::error(
                    "Attachment failed",
                    format!("Could not read {name}: {reason}"),
                ))],
                None => Vec::new(),
            }
        }
        Msg::ReplyReady {
            exchange,
            reply,
            now,
        } => {
            if state.complete_exchange(exchange, reply, now).is_none() {
                fit_debug!("Ignoring reply for stale exchange {}", exchange);
            }
            Vec::new()
        }
        Msg::AttachmentClicked { message, media } => {
            let item = state
                .media(message, media)
                .filter(|item| item.kind == MediaKind::Image)
                .cloned();
            if let Some(item) = item {
                state.open_viewer(item);
            }
            Vec::new()
        }
        Msg::ViewerClosed => {
            state.close_viewer();
            Vec::new()
        }
        Msg::DownloadClicked { message, media } => match state.media(message, media) {
            Some(item) => vec![Effect::Download {
                url: item.url.clone(),
                file_name: item.name.clone(),
            }],
            None => Vec::new(),
        },
        Msg::Teardown { now } => {
            let torn = state.reset(now);
            let mut effects = Vec::with_capacity(2);
            if let Some(exchange) = torn.cancelled {
                effects.push(Effect::CancelReply { exchange });
            }
            if !torn.released.is_empty() {
                effects.push(Effect::ReleaseObjectUrls { urls: torn.released });
            }
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn send(state: &mut AppState, now: Timestamp) -> Vec<Effect> {
    if state.is_awaiting() {
        return Vec::new();
    }
    let content = state.input().trim().to_string();
    if content.is_empty() && state.staged().is_empty() {
        return Vec::new();
    }

    let attachments = state.staged().len();
    let (exchange, prompt) = state.begin_exchange(content, now);
    fit_debug!(
        "Exchange {} started with {} attachment(s)",
        exchange,
        attachments
    );
    vec![Effect::ScheduleReply { exchange, prompt }]
}

fn select_files(state: &mut AppState, files: Vec<SelectedFile>) -> Vec<Effect> {
    if files.is_empty() || state.is_awaiting() {
        return Vec::new();
    }
    let max = state.config().max_attachment_bytes;
    if let Err(err) = validate_batch(&files, max) {
        fit_info!("Rejected attachment batch of {}: {}", files.len(), err);
        return vec![Effect::Notify(Notification::error(
            "File too large",
            format!("{err}. Each file must be {} or smaller.", format_size(max)),
        ))];
    }

    let count = files.len();
    let mut effects = Vec::with_capacity(count + 1);
    for file in files {
        let source = file.source.clone();
        let url = state.stage_file(file);
        effects.push(Effect::AcquireObjectUrl { url, source });
    }
    effects.push(Effect::Notify(Notification::info(
        "Files attached",
        format!("{count} file(s) ready to send"),
    )));
    effects
}
