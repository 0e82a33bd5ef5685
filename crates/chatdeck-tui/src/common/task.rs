//! Async task lifecycle bookkeeping.
//!
//! The reducer allocates a [`TaskId`] when it asks for work, the runtime
//! reports `TaskStarted`/`TaskCompleted`, and only the reducer mutates
//! [`TaskState`].

use chatdeck_core::SessionId;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Delayed assistant reply.
    Reply,
    /// "Refresh Prompts" indicator timer.
    PromptRefresh,
    /// Reading a dropped image file.
    ImageLoad,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskMeta {
    #[default]
    None,
    Reply {
        session_id: SessionId,
    },
    ImageLoad {
        path: String,
    },
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
    pub meta: TaskMeta,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Lifecycle state of one task kind.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
    pub meta: TaskMeta,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
        self.meta = started.meta.clone();
    }

    /// Clears the state if `id` is the active task. Returns whether it was.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
        self.meta = TaskMeta::None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub reply: TaskState,
    pub prompt_refresh: TaskState,
    pub image_load: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Reply => &self.reply,
            TaskKind::PromptRefresh => &self.prompt_refresh,
            TaskKind::ImageLoad => &self.image_load,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Reply => &mut self.reply,
            TaskKind::PromptRefresh => &mut self.prompt_refresh,
            TaskKind::ImageLoad => &mut self.image_load,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.reply.is_running() || self.prompt_refresh.is_running() || self.image_load.is_running()
    }

    /// Session waiting on the in-flight reply, if any.
    pub fn pending_reply_session(&self) -> Option<SessionId> {
        match self.reply.meta {
            TaskMeta::Reply { session_id } => Some(session_id),
            _ => None,
        }
    }
}
