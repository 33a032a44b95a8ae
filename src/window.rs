use std::collections::VecDeque;

use unicode_width::UnicodeWidthStr;

/// Bounded, order-preserving buffer of the currently visible status lines,
/// oldest first. Appending past capacity rolls the oldest line off the
/// front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWindow {
    lines: VecDeque<String>,
    capacity: usize,
}

impl MessageWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a rendered line, evicting from the front while over
    /// capacity. Returns the last line rolled off, which the waiting
    /// dance needs so it can restore the displaced line later.
    pub fn push(&mut self, line: String) -> Option<String> {
        self.lines.push_back(line);
        let mut evicted = None;
        while self.lines.len() > self.capacity {
            evicted = self.lines.pop_front();
        }
        evicted
    }

    /// Remove and return the newest line. Used to retract the synthetic
    /// waiting line before a real update lands.
    pub fn pop_back(&mut self) -> Option<String> {
        self.lines.pop_back()
    }

    /// Restore a previously displaced line to the front of the window.
    pub fn push_front(&mut self, line: String) {
        self.lines.push_front(line);
        self.lines.truncate(self.capacity);
    }

    pub fn front(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Display width in terminal columns.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Greedy word wrap at `width` columns with a hanging indent.
///
/// Every line after the first is prefixed with `hang_indent` literal
/// spaces, counted against the width. Words are never split: a single
/// word wider than the remaining room occupies its own line in full.
/// Text that already fits is returned unchanged.
pub fn wrap(text: &str, width: usize, hang_indent: usize) -> Vec<String> {
    if display_width(text) <= width {
        return vec![text.to_owned()];
    }

    let indent = " ".repeat(hang_indent);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_has_word = false;

    for word in text.split_whitespace() {
        if !current_has_word {
            current.push_str(word);
            current_has_word = true;
            continue;
        }
        if display_width(&current) + 1 + display_width(word) <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = format!("{indent}{word}");
        }
    }
    if current_has_word {
        lines.push(current);
    }
    if lines.is_empty() {
        return vec![text.to_owned()];
    }
    lines
}
