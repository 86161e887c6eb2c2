//! Fixed-width row formatting for the 16x2 character display.
//!
//! The core always hands the display driver exactly 16 characters per
//! row, space-padded — the padding contract lives here, not in the
//! driver. Content past column 16 is silently truncated (the ASCII-only
//! character set makes byte length and column count identical).

use core::fmt::{self, Write};

/// Character columns per display row.
pub const WIDTH: usize = 16;

/// One space-padded display row.
pub type Row = heapless::String<16>;

struct Truncating<'a>(&'a mut Row);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.len() >= WIDTH {
                break;
            }
            let _ = self.0.push(ch);
        }
        Ok(())
    }
}

/// Format a row, truncating at 16 columns and padding with spaces.
pub fn row(args: fmt::Arguments<'_>) -> Row {
    let mut r = Row::new();
    let _ = Truncating(&mut r).write_fmt(args);
    while r.len() < WIDTH {
        let _ = r.push(' ');
    }
    r
}

/// Shorthand for [`display::row`](crate::display::row) with `format!`-style
/// arguments.
#[macro_export]
macro_rules! row {
    ($($arg:tt)*) => {
        $crate::display::row(core::format_args!($($arg)*))
    };
}

/// A menu line with the `[V]`/`[ ]` selection marker.
pub fn marker_row(selected: bool, text: &str) -> Row {
    row(format_args!(
        "{} {}",
        if selected { "[V]" } else { "[ ]" },
        text
    ))
}

/// All spaces.
pub fn blank_row() -> Row {
    row(format_args!(""))
}
