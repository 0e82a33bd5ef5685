//! Application state composition.
//!
//! ```text
//! AppState
//! ├── manager: SessionManager   (sessions, active pointer, composer, search)
//! ├── input: TextBuffer         (editable mirror of the composer draft)
//! ├── sidebar: SidebarState     (search field, list cursor)
//! ├── transcript: TranscriptState (scroll)
//! ├── focus: Focus
//! ├── task_seq / tasks          (async task lifecycle)
//! └── config: Config
//! ```
//!
//! The manager owns the draft. `input` holds the same text plus a cursor;
//! after every event the two agree.

use chatdeck_core::SessionManager;
use chatdeck_core::config::Config;

use crate::common::{TaskSeq, Tasks};
use crate::features::composer::TextBuffer;
use crate::features::sidebar::SidebarState;
use crate::features::transcript::TranscriptState;

/// Which pane receives key input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Composer,
    Search,
    SessionList,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Composer => Focus::Search,
            Focus::Search => Focus::SessionList,
            Focus::SessionList => Focus::Composer,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Composer => Focus::SessionList,
            Focus::Search => Focus::Composer,
            Focus::SessionList => Focus::Search,
        }
    }

    pub fn in_sidebar(self) -> bool {
        matches!(self, Focus::Search | Focus::SessionList)
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub manager: SessionManager,
    pub input: TextBuffer,
    pub sidebar: SidebarState,
    pub transcript: TranscriptState,
    pub focus: Focus,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub config: Config,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// One-shot message for the status line, cleared on the next key.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            should_quit: false,
            manager: SessionManager::new(config.sidebar_expanded),
            input: TextBuffer::default(),
            sidebar: SidebarState::default(),
            transcript: TranscriptState::default(),
            focus: Focus::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            config,
            spinner_frame: 0,
            notice: None,
        }
    }

    /// True when no session is active and the landing view is shown.
    pub fn on_landing(&self) -> bool {
        self.manager.active_session().is_none()
    }

    /// Copies the manager's draft into the edit buffer.
    pub fn sync_input_from_draft(&mut self) {
        self.input.set_text(self.manager.composer().draft());
    }

    /// Copies the edit buffer into the manager's draft.
    pub fn sync_draft_from_input(&mut self) {
        if self.input.text() != self.manager.composer().draft() {
            self.manager.set_draft(self.input.text());
        }
    }
}
