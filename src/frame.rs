use std::io::{self, Write};

use crate::cursor;

const CORNER_TOP_LEFT: char = '┌';
const CORNER_TOP_RIGHT: char = '┐';
const CORNER_BOTTOM_LEFT: char = '└';
const CORNER_BOTTOM_RIGHT: char = '┘';
const SIDE: char = '│';
const STEP_PENDING: char = '░';
const STEP_DONE: char = '█';

/// Build the three static lines that outline a progress bar `total`
/// steps wide.
pub fn make_progress_frame(total: usize) -> (String, String, String) {
    let top = format!("{CORNER_TOP_LEFT}{:total$}{CORNER_TOP_RIGHT}", "");
    let mid = format!(
        "{SIDE}{}{SIDE}",
        STEP_PENDING.to_string().repeat(total)
    );
    let bottom = format!("{CORNER_BOTTOM_LEFT}{:total$}{CORNER_BOTTOM_RIGHT}", "");
    (top, mid, bottom)
}

/// Render the bar body for `completed` of `total` steps.
///
/// `completed` past `total` renders a full bar; the pending count
/// saturates at zero rather than underflowing.
pub fn bar_line(total: usize, completed: usize) -> String {
    let done = completed.min(total);
    let pending = total.saturating_sub(completed);
    format!(
        "{SIDE}{}{}{SIDE}",
        STEP_DONE.to_string().repeat(done),
        STEP_PENDING.to_string().repeat(pending)
    )
}

/// Rewrite the bar in place.
///
/// The bar's middle line sits `lines_below + 2` rows above the cursor's
/// resting position (the message region plus the frame's bottom line),
/// so the cursor travels up that distance, writes the bar, and travels
/// back down the same distance, landing exactly where it started.
pub fn update_progress<W: Write>(
    out: &mut W,
    total: usize,
    completed: usize,
    lines_below: usize,
) -> io::Result<()> {
    cursor::move_up(out, lines_below + 2)?;
    write!(out, "{}", bar_line(total, completed))?;
    cursor::move_down(out, lines_below + 2)
}
