use fit_logging::fit_debug;

use crate::attachments::{MediaKind, ObjectUrl, SelectedFile, StagedFile, StagedFiles};
use crate::config::ChatConfig;
use crate::conversation::{Conversation, MediaId, MediaItem, MessageId, Timestamp};
use crate::view_model::AppViewModel;

pub type ExchangeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingResponse { exchange: ExchangeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    config: ChatConfig,
    open: bool,
    conversation: Conversation,
    input: String,
    staged: StagedFiles,
    phase: Phase,
    viewer: Option<MediaItem>,
    next_exchange: ExchangeId,
    next_media: MediaId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AppState {
    /// Closed widget with the welcome message stamped at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self::with_config(ChatConfig::default(), now)
    }

    pub fn with_config(config: ChatConfig, now: Timestamp) -> Self {
        let conversation = Conversation::with_welcome(&config.welcome_message, now);
        Self {
            config,
            open: false,
            conversation,
            input: String::new(),
            staged: StagedFiles::default(),
            phase: Phase::Idle,
            viewer: None,
            next_exchange: 0,
            next_media: 0,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn staged(&self) -> &StagedFiles {
        &self.staged
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn viewer(&self) -> Option<&MediaItem> {
        self.viewer.as_ref()
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.phase, Phase::AwaitingResponse { .. })
    }

    /// Returns true if anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        if self.open != open {
            self.open = open;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Stages a validated file and returns the object URL it should own.
    pub(crate) fn stage_file(&mut self, file: SelectedFile) -> ObjectUrl {
        self.next_media += 1;
        let id = self.next_media;
        let url = ObjectUrl::for_media(id);
        self.staged.stage(StagedFile {
            id,
            kind: MediaKind::from_mime(&file.mime),
            name: file.name,
            size: file.size,
            mime: file.mime,
            url: url.clone(),
        });
        self.mark_dirty();
        url
    }

    pub(crate) fn unstage(&mut self, id: MediaId) -> Option<StagedFile> {
        let removed = self.staged.remove(id)?;
        self.mark_dirty();
        Some(removed)
    }

    pub(crate) fn unstage_url(&mut self, url: &ObjectUrl) -> Option<StagedFile> {
        let removed = self.staged.remove_by_url(url)?;
        self.mark_dirty();
        Some(removed)
    }

    /// Drops an already sent attachment whose bytes never loaded.
    pub(crate) fn drop_sent_media(&mut self, url: &ObjectUrl) -> Option<MediaItem> {
        let removed = self.conversation.remove_media(url)?;
        if self.viewer.as_ref().is_some_and(|item| &item.url == url) {
            self.viewer = None;
        }
        self.mark_dirty();
        Some(removed)
    }

    /// Moves input and staged files into a new user message and starts the
    /// typing placeholder. Returns the exchange id and the prompt to classify.
    pub(crate) fn begin_exchange(&mut self, content: String, now: Timestamp) -> (ExchangeId, String) {
        let media: Vec<MediaItem> = self.staged.take_all().into_iter().map(Into::into).collect();
        let prompt = prompt_for(&content, &media);
        self.conversation.push_user(content, media, now);
        self.conversation.begin_typing(now);
        self.input.clear();
        self.next_exchange += 1;
        let exchange = self.next_exchange;
        self.phase = Phase::AwaitingResponse { exchange };
        self.mark_dirty();
        (exchange, prompt)
    }

    /// Lands the reply for `exchange`. Replies for anything but the
    /// outstanding exchange are ignored.
    pub(crate) fn complete_exchange(
        &mut self,
        exchange: ExchangeId,
        reply: String,
        now: Timestamp,
    ) -> Option<MessageId> {
        if self.phase != (Phase::AwaitingResponse { exchange }) {
            return None;
        }
        let id = self.conversation.finish_typing(reply, now);
        self.phase = Phase::Idle;
        self.mark_dirty();
        id
    }

    pub(crate) fn media(&self, message: MessageId, media: MediaId) -> Option<&MediaItem> {
        self.conversation.find_media(message, media)
    }

    pub(crate) fn open_viewer(&mut self, item: MediaItem) {
        self.viewer = Some(item);
        self.mark_dirty();
    }

    pub(crate) fn close_viewer(&mut self) {
        if self.viewer.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Resets to a fresh widget and returns what was still outstanding.
    ///
    /// Id counters survive the reset so a reply for a cancelled exchange can
    /// never match a later one.
    pub(crate) fn reset(&mut self, now: Timestamp) -> Teardown {
        let cancelled = match self.phase {
            Phase::AwaitingResponse { exchange } => Some(exchange),
            Phase::Idle => None,
        };
        if self.conversation.clear_typing() {
            fit_debug!("Dropped typing placeholder on teardown");
        }
        let mut released = self.staged.urls();
        released.extend(self.conversation.media_urls());

        self.staged = StagedFiles::default();

        self.conversation = Conversation::with_welcome(&self.config.welcome_message, now);
        self.input.clear();
        self.phase = Phase::Idle;
        self.viewer = None;
        self.open = false;
        self.mark_dirty();

        Teardown {
            cancelled,
            released,
        }
    }
}

pub(crate) struct Teardown {
    pub cancelled: Option<ExchangeId>,
    pub released: Vec<ObjectUrl>,
}

/// Text handed to the responder. A media-only send is routed by the kind of
/// the attachments so it still reaches the image or document reply.
fn prompt_for(content: &str, media: &[MediaItem]) -> String {
    if !content.trim().is_empty() {
        return content.to_string();
    }
    if media.iter().any(|item| item.kind == MediaKind::Image) {
        "image".to_string()
    } else if media.is_empty() {
        String::new()
    } else {
        "file".to_string()
    }
}
