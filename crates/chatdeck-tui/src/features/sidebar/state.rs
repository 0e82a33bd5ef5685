use std::cell::Cell;

use crate::features::composer::TextBuffer;

/// Sidebar UI state. The query itself lives in the session manager; `search`
/// is its editable mirror.
#[derive(Debug, Default)]
pub struct SidebarState {
    pub search: TextBuffer,
    /// Highlighted row in the filtered list.
    pub selected: usize,
    /// First list item drawn. Updated by the render pass.
    offset: Cell<usize>,
}

impl SidebarState {
    /// Highlighted row clamped to a list of `len` rows.
    pub fn selected_index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.selected.min(len - 1))
    }

    pub fn select_prev(&mut self, len: usize) {
        if let Some(idx) = self.selected_index(len) {
            self.selected = idx.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if let Some(idx) = self.selected_index(len) {
            self.selected = (idx + 1).min(len - 1);
        }
    }

    /// First item of the window that keeps `selected` in view.
    ///
    /// `heights` holds the row count of each item and `capacity` the rows
    /// available. The window only moves when the selection leaves it.
    pub fn window_start(&self, heights: &[usize], selected: Option<usize>, capacity: usize) -> usize {
        let mut offset = self.offset.get().min(heights.len().saturating_sub(1));
        if let Some(sel) = selected {
            if sel < offset {
                offset = sel;
            }
            while offset < sel && heights[offset..=sel].iter().sum::<usize>() > capacity {
                offset += 1;
            }
        }
        self.offset.set(offset);
        offset
    }
}
