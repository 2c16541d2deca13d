use crate::attachments::StagedFile;
use crate::conversation::{MediaItem, Message};
use crate::state::{AppState, Phase};

/// Render snapshot of the assistant widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub open: bool,
    pub phase: Phase,
    pub messages: Vec<Message>,
    pub input: String,
    pub input_enabled: bool,
    pub can_send: bool,
    pub staged: Vec<StagedFile>,
    pub viewer: Option<MediaItem>,
    /// Shown only until the first exchange.
    pub suggestions: Vec<String>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let input_enabled = !state.is_awaiting();
        let has_payload = !state.input().trim().is_empty() || !state.staged().is_empty();
        let conversation = state.conversation();
        let suggestions = if conversation.len() <= 1 {
            state.config().suggestions.clone()
        } else {
            Vec::new()
        };

        Self {
            open: state.is_open(),
            phase: state.phase(),
            messages: conversation.messages().to_vec(),
            input: state.input().to_string(),
            input_enabled,
            can_send: input_enabled && has_payload,
            staged: state.staged().files().to_vec(),
            viewer: state.viewer().cloned(),
            suggestions,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.messages.last().is_some_and(|message| message.is_typing)
    }
}
