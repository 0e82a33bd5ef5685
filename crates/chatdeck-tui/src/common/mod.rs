//! Shared leaf types for TUI features.
//!
//! Contains types with no feature dependencies (tasks, text helpers).
//!
//! This module must NOT import `UiEvent` or feature-specific state.

pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskKind, TaskMeta, TaskSeq, TaskStarted, TaskState, Tasks};
pub use text::{sanitize_for_display, truncate_with_ellipsis, wrap_text};
