//! List navigation for the 2-row display.
//!
//! [`ListNav`] paginates N single-line items behind a 2-row window.
//! [`LogNav`] is the event-log variant: line 0 is a fixed "Back" row and
//! each log entry occupies two display lines, so the cursor steps in
//! strides of 2 with the same clamp and window rules.

use crate::input::DirectionLatch;

/// Rows visible on the character display.
pub const VISIBLE_ROWS: usize = 2;

// ---------------------------------------------------------------------------
// Plain item lists
// ---------------------------------------------------------------------------

/// Cursor + scroll window over a list of single-line items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListNav {
    cursor: usize,
    scroll: usize,
    /// Debounce latch for the joystick direction driving this list.
    pub latch: DirectionLatch,
}

impl ListNav {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            scroll: 0,
            latch: DirectionLatch::new(),
        }
    }

    /// Start with the cursor already on `cursor`, window scrolled so the
    /// cursor is visible on the bottom row.
    pub const fn at(cursor: usize) -> Self {
        let scroll = if cursor >= VISIBLE_ROWS { cursor - 1 } else { 0 };
        Self {
            cursor,
            scroll,
            latch: DirectionLatch::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Move the cursor one item forward, clamped to `item_count - 1`.
    /// Returns `true` if the cursor moved (callers repaint on movement).
    pub fn advance(&mut self, item_count: usize) -> bool {
        if item_count == 0 || self.cursor + 1 >= item_count {
            return false;
        }
        self.cursor += 1;
        if self.cursor >= self.scroll + VISIBLE_ROWS {
            self.scroll = self.cursor - 1;
        }
        true
    }

    /// Move the cursor one item back, clamped to 0.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        true
    }

    /// Item indices currently visible, top row first.
    pub fn visible(&self, item_count: usize) -> impl Iterator<Item = usize> + '_ {
        (self.scroll..item_count).take(VISIBLE_ROWS)
    }
}

// ---------------------------------------------------------------------------
// Event-log list (fixed Back row, two lines per entry)
// ---------------------------------------------------------------------------

/// What the log cursor currently rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRow {
    /// The fixed "Back" row at the top.
    Back,
    /// A log entry, by oldest-first view index.
    Entry(usize),
}

/// Log-screen navigation: logical line 0 is "Back"; entry `i` starts at
/// line `1 + 2*i`. Advancing steps a whole entry (stride 2).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNav {
    line: usize,
    scroll: usize,
    pub latch: DirectionLatch,
}

impl LogNav {
    pub const fn new() -> Self {
        Self {
            line: 0,
            scroll: 0,
            latch: DirectionLatch::new(),
        }
    }

    /// Which row the cursor selects.
    pub fn selected(&self) -> LogRow {
        if self.line == 0 {
            LogRow::Back
        } else {
            LogRow::Entry((self.line - 1) / 2)
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Step to the next entry, clamped to the last one.
    pub fn advance(&mut self, entry_count: usize) -> bool {
        let total_lines = 1 + entry_count * 2;
        if self.line == 0 {
            if entry_count == 0 {
                return false;
            }
            self.line = 1;
            self.scroll = 0;
            return true;
        }
        let prev = self.line;
        self.line += 2;
        if self.line >= total_lines {
            self.line = total_lines - 2;
        }
        if self.line >= self.scroll + VISIBLE_ROWS {
            self.scroll = self.line;
        }
        self.line != prev
    }

    /// Step back one entry; stepping back from the first entry lands on
    /// the Back row.
    pub fn retreat(&mut self) -> bool {
        if self.line > 1 {
            self.line -= 2;
            if self.line < 1 {
                self.line = 1;
            }
            if self.line < self.scroll {
                self.scroll = self.line.saturating_sub(1);
            }
            true
        } else if self.line == 1 {
            self.line = 0;
            self.scroll = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_rights_then_lefts_track_window() {
        let mut nav = ListNav::new();
        assert_eq!((nav.cursor(), nav.scroll_offset()), (0, 0));

        nav.advance(3);
        nav.advance(3);
        nav.advance(3); // clamped
        assert_eq!((nav.cursor(), nav.scroll_offset()), (2, 1));

        nav.retreat();
        assert_eq!((nav.cursor(), nav.scroll_offset()), (1, 1));

        nav.retreat();
        assert_eq!((nav.cursor(), nav.scroll_offset()), (0, 0));
    }

    #[test]
    fn advance_clamps_at_last_item() {
        let mut nav = ListNav::new();
        for _ in 0..10 {
            nav.advance(3);
        }
        assert_eq!(nav.cursor(), 2);
    }

    #[test]
    fn retreat_clamps_at_zero() {
        let mut nav = ListNav::new();
        assert!(!nav.retreat());
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn visible_window_follows_cursor() {
        let mut nav = ListNav::new();
        assert_eq!(nav.visible(3).collect::<Vec<_>>(), vec![0, 1]);
        nav.advance(3);
        nav.advance(3);
        assert_eq!(nav.visible(3).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_list_never_moves() {
        let mut nav = ListNav::new();
        assert!(!nav.advance(0));
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn log_nav_starts_on_back() {
        let nav = LogNav::new();
        assert_eq!(nav.selected(), LogRow::Back);
    }

    #[test]
    fn log_nav_strides_whole_entries() {
        let mut nav = LogNav::new();
        assert!(nav.advance(3));
        assert_eq!(nav.selected(), LogRow::Entry(0));
        assert!(nav.advance(3));
        assert_eq!(nav.selected(), LogRow::Entry(1));
        assert!(nav.advance(3));
        assert_eq!(nav.selected(), LogRow::Entry(2));
        // Clamped at the newest entry.
        assert!(!nav.advance(3));
        assert_eq!(nav.selected(), LogRow::Entry(2));
    }

    #[test]
    fn log_nav_retreats_to_back_row() {
        let mut nav = LogNav::new();
        nav.advance(2);
        nav.advance(2);
        assert_eq!(nav.selected(), LogRow::Entry(1));
        nav.retreat();
        assert_eq!(nav.selected(), LogRow::Entry(0));
        nav.retreat();
        assert_eq!(nav.selected(), LogRow::Back);
        assert!(!nav.retreat());
    }

    #[test]
    fn log_nav_ignores_advance_when_empty() {
        let mut nav = LogNav::new();
        assert!(!nav.advance(0));
        assert_eq!(nav.selected(), LogRow::Back);
    }
}
