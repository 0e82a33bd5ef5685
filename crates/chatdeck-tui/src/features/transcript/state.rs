use std::cell::Cell;

/// Scroll position, counted in lines up from the bottom.
///
/// `0` follows the latest message. The render pass records how far the
/// current content can scroll so key handling can clamp.
#[derive(Debug, Default)]
pub struct TranscriptState {
    offset: usize,
    max_offset: Cell<usize>,
}

impl TranscriptState {
    pub fn offset(&self) -> usize {
        self.offset.min(self.max_offset.get())
    }

    pub fn follow(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = (self.offset() + lines).min(self.max_offset.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset().saturating_sub(lines);
    }

    pub fn set_max_offset(&self, max: usize) {
        self.max_offset.set(max);
    }
}
