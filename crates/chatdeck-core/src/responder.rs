//! Reply backend.
//!
//! The runtime asks a [`Responder`] for the assistant's answer once a reply
//! task's delay has elapsed. Only a placeholder backend exists.

use std::time::Duration;

use crate::config::Config;
use crate::session::Message;

/// Default placeholder answer.
pub const PLACEHOLDER_REPLY: &str = "This is a dummy response from the AI.";

/// Produces assistant replies.
pub trait Responder: Send + Sync {
    /// Delay before the reply is delivered.
    fn latency(&self) -> Duration;

    /// Reply text for a session history (oldest first).
    fn reply(&self, history: &[Message]) -> String;
}

/// Fixed reply after a fixed delay.
#[derive(Debug, Clone)]
pub struct PlaceholderResponder {
    text: String,
    latency: Duration,
}

impl PlaceholderResponder {
    pub fn new(text: impl Into<String>, latency: Duration) -> Self {
        Self {
            text: text.into(),
            latency,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.placeholder_reply.clone(), config.reply_latency())
    }
}

impl Default for PlaceholderResponder {
    fn default() -> Self {
        Self::new(PLACEHOLDER_REPLY, Duration::from_millis(2000))
    }
}

impl Responder for PlaceholderResponder {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn reply(&self, _history: &[Message]) -> String {
        self.text.clone()
    }
}
