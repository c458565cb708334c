//! Status and message bar composition.
//!
//! Pure string building, separated from escape-sequence emission so the
//! layout is testable without a terminal. The status bar shows the file name
//! (truncated), line count, modified marker, then right-aligns the file type
//! and cursor position; the right segment is dropped entirely when it does
//! not fit.

use core_state::Document;
use std::time::Instant;

const FILE_NAME_MAX: usize = 20;

pub fn build_status_line(doc: &Document, cols: usize) -> String {
    let name = doc
        .file_name()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[No Name]".to_string());
    let name: String = name.chars().take(FILE_NAME_MAX).collect();
    let modified = if doc.is_dirty() { " (modified)" } else { "" };
    let left = format!("{} - {} lines{}", name, doc.num_rows(), modified);

    let file_type = doc.syntax().map_or("no ft", |s| s.file_type);
    let right = format!("{} | {}/{}", file_type, doc.cy + 1, doc.num_rows());

    let mut line: String = left.chars().take(cols).collect();
    let right_len = right.chars().count();
    while line.chars().count() < cols {
        if cols - line.chars().count() == right_len {
            line.push_str(&right);
            break;
        }
        line.push(' ');
    }
    line
}

/// The message bar content at `now`: the transient status message while it
/// is younger than the expiry window, clipped to the screen width.
pub fn build_message_line(doc: &Document, now: Instant, cols: usize) -> String {
    match doc.visible_status(now) {
        Some(message) => message.chars().take(cols).collect(),
        None => String::new(),
    }
}
