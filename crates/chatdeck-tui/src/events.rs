//! UI events consumed by the reducer.
//!
//! Terminal input, timer ticks and async task results all arrive as
//! [`UiEvent`]s. Task results are wrapped in `TaskCompleted` so the reducer
//! can drop stale ones.

use chatdeck_core::SessionId;
use chatdeck_core::attachment::ImageFile;
use crossterm::event::Event;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Animation tick.
    Tick,
    /// Raw terminal input.
    Terminal(Event),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// The assistant reply for `session_id` is ready.
    ReplyReady {
        session_id: SessionId,
        content: String,
    },
    /// The prompt refresh indicator has run its course.
    PromptsRefreshed,
    /// A dropped image file was read.
    ImageLoaded(ImageFile),
    ImageLoadFailed {
        path: String,
        error: String,
    },
    /// The image load was superseded before it finished.
    ImageLoadCancelled,
}
