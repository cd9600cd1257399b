/// Scroll position of a transcript area, counted in lines from the bottom
///
/// Growth of the content snaps the view back to the bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    seen: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines scrolled up from the bottom
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset == 0
    }

    /// Report the current content size; any growth returns to the bottom
    pub fn observe(&mut self, size: usize) {
        if size > self.seen {
            self.offset = 0;
        }
        self.seen = size;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn to_bottom(&mut self) {
        self.offset = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// First visible line for `total` lines in a viewport of `height`.
    ///
    /// Clamps the stored offset so scrolling past the top stops there.
    pub fn window_start(&mut self, total: usize, height: usize) -> usize {
        let max_offset = total.saturating_sub(height);
        self.offset = self.offset.min(max_offset);
        total.saturating_sub(height + self.offset)
    }
}
