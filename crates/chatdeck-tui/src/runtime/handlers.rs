//! Effect handlers.
//!
//! Each handler is an async function that performs the work behind one
//! effect and returns the resulting [`UiEvent`]. The runtime spawns them and
//! forwards the result to the inbox; they never touch `AppState`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chatdeck_core::ReplyTicket;
use chatdeck_core::attachment;
use chatdeck_core::responder::Responder;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::events::UiEvent;

/// Waits for the responder's latency, then produces its reply for the
/// ticket's session.
pub async fn deliver_reply(responder: Arc<dyn Responder>, ticket: ReplyTicket) -> UiEvent {
    tokio::time::sleep(responder.latency()).await;
    let content = responder.reply(&ticket.history);
    debug!(session = %ticket.session_id, message = ticket.message_id.0, "reply ready");
    UiEvent::ReplyReady {
        session_id: ticket.session_id,
        content,
    }
}

/// Ends the prompt refresh after `delay`.
pub async fn finish_refresh(delay: Duration) -> UiEvent {
    tokio::time::sleep(delay).await;
    UiEvent::PromptsRefreshed
}

/// Reads an image file off the async runtime. Cancellation wins over a
/// read that is still in progress.
pub async fn load_image(path: PathBuf, cancel: Option<CancellationToken>) -> UiEvent {
    let display = path.display().to_string();
    let read = tokio::task::spawn_blocking(move || attachment::read_image_file(&path));

    let joined = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => return UiEvent::ImageLoadCancelled,
                joined = read => joined,
            }
        }
        None => read.await,
    };

    match joined {
        Ok(Ok(file)) => UiEvent::ImageLoaded(file),
        Ok(Err(e)) => UiEvent::ImageLoadFailed {
            path: display,
            error: e.to_string(),
        },
        Err(e) => UiEvent::ImageLoadFailed {
            path: display,
            error: format!("Task failed: {e}"),
        },
    }
}
