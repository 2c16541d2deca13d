use serde::{Deserialize, Serialize};

use crate::attachments::{MediaKind, ObjectUrl};

pub type MessageId = u64;
pub type MediaId = u64;
/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub kind: MediaKind,
    pub url: ObjectUrl,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_typing: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaItem>,
}

/// Ordered message list.
///
/// Holds at most one typing placeholder, and only ever as the last element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Conversation {
    pub fn with_welcome(welcome: &str, now: Timestamp) -> Self {
        let mut conversation = Self::default();
        conversation.push(welcome.to_string(), Sender::Assistant, now, false, Vec::new());
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.messages.last().is_some_and(|message| message.is_typing)
    }

    /// Appends a user message, keeping a pending placeholder last.
    pub fn push_user(&mut self, content: String, media: Vec<MediaItem>, now: Timestamp) -> MessageId {
        let placeholder = self.take_placeholder();
        let id = self.push(content, Sender::User, now, false, media);
        if let Some(placeholder) = placeholder {
            self.messages.push(placeholder);
        }
        id
    }

    /// Appends the typing placeholder. Returns `None` if one is already pending.
    pub fn begin_typing(&mut self, now: Timestamp) -> Option<MessageId> {
        if self.is_typing() {
            return None;
        }
        Some(self.push(String::new(), Sender::Assistant, now, true, Vec::new()))
    }

    /// Replaces the placeholder with the assistant's reply.
    pub fn finish_typing(&mut self, reply: String, now: Timestamp) -> Option<MessageId> {
        self.take_placeholder()?;
        Some(self.push(reply, Sender::Assistant, now, false, Vec::new()))
    }

    pub fn clear_typing(&mut self) -> bool {
        self.take_placeholder().is_some()
    }

    pub fn find_media(&self, message: MessageId, media: MediaId) -> Option<&MediaItem> {
        self.messages
            .iter()
            .find(|m| m.id == message)?
            .media
            .iter()
            .find(|item| item.id == media)
    }

    /// Removes the attachment owning `url` from whichever message holds it.
    pub fn remove_media(&mut self, url: &ObjectUrl) -> Option<MediaItem> {
        self.messages.iter_mut().find_map(|message| {
            let index = message.media.iter().position(|item| &item.url == url)?;
            Some(message.media.remove(index))
        })
    }

    /// Every object URL still referenced by a sent message.
    pub fn media_urls(&self) -> Vec<ObjectUrl> {
        self.messages
            .iter()
            .flat_map(|message| message.media.iter().map(|item| item.url.clone()))
            .collect()
    }

    /// Messages without the typing placeholder.
    pub fn transcript(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|message| !message.is_typing)
            .cloned()
            .collect()
    }

    fn take_placeholder(&mut self) -> Option<Message> {
        if self.is_typing() {
            self.messages.pop()
        } else {
            None
        }
    }

    fn push(
        &mut self,
        content: String,
        sender: Sender,
        timestamp: Timestamp,
        is_typing: bool,
        media: Vec<MediaItem>,
    ) -> MessageId {
        self.next_id += 1;
        let id = self.next_id;
        self.messages.push(Message {
            id,
            content,
            sender,
            timestamp,
            is_typing,
            media,
        });
        id
    }
}
