use std::io::{self, Write};

/// Move the cursor up one row, column unchanged.
pub const CURSOR_UP: &str = "\x1b[A";

/// Move up one row and blank it with `width` spaces.
///
/// Erasure pads to the display width of the line being replaced so a
/// shorter replacement never leaves stale glyphs behind.
pub fn erase_above<W: Write>(out: &mut W, width: usize) -> io::Result<()> {
    write!(out, "\r{CURSOR_UP}{:width$}", "")
}

/// Rewrite the current row from column 0 and advance to the next row.
pub fn rewrite_line<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    writeln!(out, "\r{line}")
}

/// Move up `rows` rows and return to column 0.
pub fn move_up<W: Write>(out: &mut W, rows: usize) -> io::Result<()> {
    write!(out, "{}\r", CURSOR_UP.repeat(rows))
}

/// Move down `rows` rows and return to column 0.
///
/// Movement is always relative: the writers above track exactly how many
/// rows they emitted, so a matched `move_up`/`move_down` pair restores the
/// cursor to its pre-call resting position.
pub fn move_down<W: Write>(out: &mut W, rows: usize) -> io::Result<()> {
    write!(out, "{}\r", "\n".repeat(rows))
}
