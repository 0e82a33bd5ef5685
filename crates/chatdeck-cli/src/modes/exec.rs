//! Headless mode: one session, one message, one reply.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chatdeck_core::attachment;
use chatdeck_core::config::Config;
use chatdeck_core::responder::{PlaceholderResponder, Responder};
use chatdeck_core::{Session, SessionManager};
use tracing::info;

pub struct ExecOptions<'a> {
    pub prompt: &'a str,
    pub image: Option<&'a Path>,
}

/// Sends the prompt (and image) in a fresh session and waits for the reply.
pub async fn run_exec(options: &ExecOptions<'_>, config: &Config) -> Result<Session> {
    let responder = PlaceholderResponder::from_config(config);
    let mut manager = SessionManager::new(false);
    let session_id = manager.create_session();

    if let Some(raw) = options.image {
        let path = attachment::normalize_input_path(&raw.to_string_lossy());
        let file = attachment::read_image_file(&path)
            .with_context(|| format!("attach image {}", path.display()))?;
        if !manager.attach_image_file(&file) {
            anyhow::bail!("{} is not an image", path.display());
        }
    }

    let ticket = manager
        .send_message(options.prompt)
        .ok_or_else(|| anyhow!("Nothing to send: the prompt is empty and no image is attached"))?;

    tokio::time::sleep(responder.latency()).await;
    let reply = responder.reply(&ticket.history);
    manager.complete_reply(ticket.session_id, reply);
    info!(session = %session_id, "exec round trip complete");

    manager
        .session(session_id)
        .cloned()
        .ok_or_else(|| anyhow!("session {session_id} disappeared"))
}

/// Plain-text transcript, one `author: text` line per entry.
pub fn format_transcript(session: &Session) -> String {
    let mut out = String::new();
    for message in session.messages() {
        let label = message.author.label();
        if !message.content.is_empty() {
            let _ = writeln!(out, "{label}: {}", message.content);
        }
        if let Some(image) = &message.attachment {
            let _ = writeln!(out, "{label}: {}", image.label());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Config {
        Config {
            reply_latency_ms: 0,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn exec_returns_user_and_reply() {
        let options = ExecOptions {
            prompt: "hello",
            image: None,
        };
        let session = run_exec(&options, &fast_config()).await.unwrap();

        assert_eq!(session.title, "New Chat 1");
        assert_eq!(
            format_transcript(&session),
            "you: hello\nassistant: This is a dummy response from the AI.\n"
        );
    }

    #[tokio::test]
    async fn exec_rejects_empty_prompt() {
        let options = ExecOptions {
            prompt: "  ",
            image: None,
        };
        assert!(run_exec(&options, &fast_config()).await.is_err());
    }
}
