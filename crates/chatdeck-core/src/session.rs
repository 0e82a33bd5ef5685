//! Chat sessions and their messages.
//!
//! A [`Session`] is an append-only list of [`Message`]s. Ids for both are
//! handed out by [`IdSeq`], so creation order and id order always agree.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::attachment::Attachment;

/// Identifier of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a message, unique across all sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// Monotonic id generator.
///
/// Starts at 1 so that a zero id never shows up in rendered output.
#[derive(Debug)]
pub struct IdSeq {
    next: u64,
}

impl Default for IdSeq {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSeq {
    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

impl Author {
    pub fn label(self) -> &'static str {
        match self {
            Author::User => "you",
            Author::Assistant => "assistant",
        }
    }
}

/// A single transcript entry. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            id,
            author: Author::User,
            content: content.into(),
            attachment,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::Assistant,
            content: content.into(),
            attachment: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    /// One-line summary used by the sidebar.
    ///
    /// Falls back to the attachment label when the message carries only an image.
    pub fn preview(&self) -> String {
        let first_line = self.content.lines().next().unwrap_or("").trim();
        if !first_line.is_empty() {
            return first_line.to_string();
        }
        match &self.attachment {
            Some(attachment) => attachment.label(),
            None => String::new(),
        }
    }
}

/// A conversation thread.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    messages: Vec<Message>,
}

impl Session {
    pub(crate) fn new(id: SessionId, title: String) -> Self {
        Self {
            id,
            title,
            messages: Vec::new(),
        }
    }

    /// Title given to the `ordinal`-th session (1-based).
    pub fn default_title(ordinal: usize) -> String {
        format!("New Chat {ordinal}")
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Preview text for the sidebar: the last message, if any.
    pub fn preview(&self) -> Option<String> {
        self.last_message().map(Message::preview)
    }

    /// Case-insensitive substring match on the title.
    pub fn title_matches(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}
