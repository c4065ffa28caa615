//! Scroll position of the message list and the follow-the-newest-message effect.

/// Vertical scroll state of the message list, in terminal rows.
///
/// `viewport_height` and `content_height` are written while drawing, so they
/// always describe the last frame that reached the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
    pub offset: u32,
    pub viewport_height: u32,
    pub content_height: u32,
}

impl ListViewport {
    pub fn max_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn scroll_down(&mut self, rows: u32) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, rows: u32) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn page(&self) -> u32 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    /// Record a fresh layout and keep the offset inside it.
    pub fn update_layout(&mut self, viewport_height: u32, content_height: u32) {
        self.viewport_height = viewport_height;
        self.content_height = content_height;
        self.offset = self.offset.min(self.max_offset());
    }
}

/// Scrolls to the newest message once per store revision.
///
/// It only acts on a revision that has already been drawn, so the measured
/// content height includes the message that triggered it.
#[derive(Debug, Default)]
pub struct AutoScroll {
    seen_revision: Option<u64>,
    runs: usize,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the viewport moved and the screen needs another draw.
    pub fn run(&mut self, drawn_revision: Option<u64>, viewport: &mut ListViewport) -> bool {
        let Some(revision) = drawn_revision else {
            return false;
        };
        if self.seen_revision == Some(revision) {
            return false;
        }

        self.seen_revision = Some(revision);
        self.runs += 1;
        viewport.scroll_to_bottom();
        tracing::debug!(revision, offset = viewport.offset, "scrolled to newest message");
        true
    }

    pub fn runs(&self) -> usize {
        self.runs
    }
}
