//! FitFusion core: the assistant widget as a pure state machine.
//!
//! `update` applies a [`Msg`] and returns the [`Effect`]s the host must run.
//! Nothing in this crate touches the clock, the filesystem or timers.
mod attachments;
mod config;
mod conversation;
mod effect;
mod msg;
pub mod responder;
mod state;
mod update;
mod view_model;

pub use attachments::{
    format_size, validate_batch, AttachmentError, MediaKind, ObjectUrl, SelectedFile, StagedFile,
    StagedFiles, MAX_ATTACHMENT_BYTES,
};
pub use config::{ChatConfig, WELCOME_MESSAGE};
pub use conversation::{Conversation, MediaId, MediaItem, Message, MessageId, Sender, Timestamp};
pub use effect::{Effect, Notification, NotificationLevel};
pub use msg::Msg;
pub use responder::{generate_response, Responder};
pub use state::{AppState, ExchangeId, Phase};
pub use update::update;
pub use view_model::AppViewModel;
