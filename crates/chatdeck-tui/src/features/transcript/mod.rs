//! Transcript feature: the active session's messages.

mod render;
mod state;

pub use render::{render_transcript, transcript_lines};
pub use state::TranscriptState;
