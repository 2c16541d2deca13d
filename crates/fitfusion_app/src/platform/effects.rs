use fit_logging::{fit_debug, fit_info, fit_warn};
use fitfusion_core::{Effect, Message, Msg, Notification, Timestamp};
use fitfusion_engine::{EngineEvent, EngineHandle, UpdateEvent, UpdateStage};

/// What the app loop should do with an engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatch(Msg),
    Notify(Notification),
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands effects to the engine. Toasts come back for the renderer.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::ScheduleReply { exchange, prompt } => {
                    fit_debug!("ScheduleReply exchange={} prompt_len={}", exchange, prompt.len());
                    self.engine.schedule_reply(exchange, prompt);
                }
                Effect::CancelReply { exchange } => self.engine.cancel_reply(exchange),
                Effect::AcquireObjectUrl { url, source } => {
                    self.engine.acquire_object_url(url, source)
                }
                Effect::ReleaseObjectUrls { urls } => {
                    if !urls.is_empty() {
                        self.engine.release_object_urls(urls);
                    }
                }
                Effect::Download { url, file_name } => self.engine.download(url, file_name),
                Effect::Notify(notice) => notices.push(notice),
            }
        }
        notices
    }

    pub fn export_transcript(&self, messages: Vec<Message>) {
        fit_info!("Exporting {} message(s)", messages.len());
        self.engine.export_transcript(messages);
    }

    pub fn start_update(&self) {
        self.engine.start_update();
    }

    pub fn cancel_update(&self) {
        self.engine.cancel_update();
    }

    /// Drains every event the engine has produced so far.
    pub fn poll(&self, now: Timestamp) -> Vec<Outcome> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(|event| map_event(event, now))
            .collect()
    }
}

pub fn map_event(event: EngineEvent, now: Timestamp) -> Outcome {
    match event {
        EngineEvent::ReplyReady { exchange, reply } => {
            Outcome::Dispatch(Msg::ReplyReady { exchange, reply, now })
        }
        EngineEvent::ObjectUrlFailed { url, reason } => {
            fit_warn!("Object url {} failed: {}", url, reason);
            Outcome::Dispatch(Msg::ObjectUrlFailed { url, reason })
        }
        EngineEvent::Downloaded { file_name, path } => Outcome::Notify(Notification::success(
            "Download complete",
            format!("{} saved to {}", file_name, path.display()),
        )),
        EngineEvent::TranscriptExported {
            path,
            message_count,
        } => Outcome::Notify(Notification::success(
            "Transcript exported",
            format!("{} message(s) written to {}", message_count, path.display()),
        )),
        EngineEvent::Update(update) => Outcome::Notify(update_notice(update)),
        EngineEvent::Failed { operation, message } => Outcome::Notify(Notification::error(
            format!("{} failed", capitalize(operation)),
            message,
        )),
    }
}

fn update_notice(event: UpdateEvent) -> Notification {
    match event {
        UpdateEvent::Progress { stage, percent } => {
            let stage = match stage {
                UpdateStage::Downloading => "Downloading",
                UpdateStage::Verifying => "Verifying",
                UpdateStage::Installing => "Installing",
            };
            Notification::info("Updating", format!("{stage}... {percent}%"))
        }
        UpdateEvent::Installed { version } => Notification::success(
            "Update installed",
            format!("FitFusion {version} is ready"),
        ),
        UpdateEvent::UpToDate { version } => Notification::info(
            "Up to date",
            format!("FitFusion {version} is the latest version"),
        ),
        UpdateEvent::Cancelled => Notification::info("Update cancelled", "Nothing was changed"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
