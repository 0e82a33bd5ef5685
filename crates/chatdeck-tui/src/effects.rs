//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover timers and file I/O only; the reducer never spawns anything
//! itself.

use std::path::PathBuf;

use chatdeck_core::ReplyTicket;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Deliver the assistant reply for `ticket` after the responder's latency.
    ScheduleReply { task: TaskId, ticket: ReplyTicket },

    /// End the prompt refresh after the configured delay.
    ScheduleRefresh { task: TaskId },

    /// Read an image file for the composer.
    LoadImage { task: TaskId, path: PathBuf },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
