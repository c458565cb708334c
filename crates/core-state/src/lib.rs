//! Document state: the ordered row collection, cursor and viewport offsets,
//! dirty counter, active syntax profile, and transient status message.
//!
//! All mutation flows through `Document` methods so the row invariant holds:
//! after any raw edit the touched row's render bytes are recomputed (inside
//! `core-text`) and its highlight tags reclassified here, before the caller
//! can observe the row again.
//!
//! Ownership is strictly single-writer: one `Document` lives on the control
//! thread, nothing is shared, nothing locks.

use anyhow::{Context, Result};
use core_syntax::{SyntaxProfile, highlight_row, select_profile};
use core_text::Row;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// How long a status message stays visible on the message bar.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Save failures reported on the message bar; the buffer and dirty counter
/// are left untouched so the user can retry.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no file name set")]
    NoFileName,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The in-memory document plus everything the renderer needs to place it.
#[derive(Default)]
pub struct Document {
    rows: Vec<Row>,
    /// Cursor in raw-byte / row-index space.
    pub cx: usize,
    pub cy: usize,
    /// Derived render-column cursor; recomputed by [`scroll`](Self::scroll).
    pub rx: usize,
    pub row_offset: usize,
    pub col_offset: usize,
    dirty: u32,
    file_name: Option<PathBuf>,
    syntax: Option<&'static SyntaxProfile>,
    status: Option<(String, Instant)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from in-memory text, splitting on `\n` and stripping
    /// a trailing `\r` per line. Used by `open` and by tests.
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut doc = Self::new();
        let mut body = content;
        // A trailing newline terminates the last row rather than opening an
        // empty one.
        if body.last() == Some(&b'\n') {
            body = &body[..body.len() - 1];
        }
        if !body.is_empty() || content.last() == Some(&b'\n') {
            for line in body.split(|&b| b == b'\n') {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                let at = doc.rows.len();
                doc.insert_row(at, line.to_vec());
            }
        }
        doc.dirty = 0;
        doc
    }

    /// Read a whole file as lines. I/O failures propagate; the caller decides
    /// whether they are fatal.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut doc = Self::from_bytes(&content);
        doc.file_name = Some(path.to_path_buf());
        doc.select_syntax();
        info!(target: "io", file = %path.display(), rows = doc.rows.len(), "file_opened");
        Ok(doc)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn syntax(&self) -> Option<&'static SyntaxProfile> {
        self.syntax
    }

    /// Rename the buffer (open, or first save of an unnamed buffer) and
    /// reselect the syntax profile, reclassifying every row.
    pub fn set_file_name(&mut self, name: PathBuf) {
        self.file_name = Some(name);
        self.select_syntax();
    }

    fn select_syntax(&mut self) {
        self.syntax = self
            .file_name
            .as_deref()
            .and_then(|p| p.to_str())
            .and_then(select_profile);
        for row in &mut self.rows {
            if let Some(profile) = self.syntax {
                highlight_row(row, profile);
            }
        }
    }

    /// Reclassify one row after a raw mutation. Render bytes were already
    /// recomputed by the `Row` mutator.
    fn touch(&mut self, at: usize) {
        if let (Some(profile), Some(row)) = (self.syntax, self.rows.get_mut(at)) {
            highlight_row(row, profile);
        }
    }

    /// Insert a new row at `at`, clamped to `[0, num_rows]`.
    pub fn insert_row(&mut self, at: usize, bytes: Vec<u8>) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::from_bytes(bytes));
        self.touch(at);
        self.dirty += 1;
    }

    /// Remove the row at `at`; no-op when out of range.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert a character at the cursor, appending an empty row first when
    /// the cursor sits past the last row.
    pub fn insert_char(&mut self, ch: char) {
        if self.cy == self.rows.len() {
            let at = self.rows.len();
            self.insert_row(at, Vec::new());
        }
        let advanced = self.rows[self.cy].insert_char(self.cx, ch);
        self.cx += advanced;
        self.touch(self.cy);
        self.dirty += 1;
    }

    /// Backspace semantics: remove the byte before the cursor, or merge the
    /// current row onto the previous one when the cursor is at column 0.
    /// The merge is the exact inverse of [`insert_newline`](Self::insert_newline).
    pub fn delete_char(&mut self) {
        if self.cy == self.rows.len() {
            return;
        }
        if self.cx == 0 && self.cy == 0 {
            return;
        }
        if self.cx > 0 {
            self.rows[self.cy].delete_byte(self.cx - 1);
            self.cx -= 1;
            self.touch(self.cy);
            self.dirty += 1;
        } else {
            let merged = self.rows[self.cy].raw().to_vec();
            let prev_len = self.rows[self.cy - 1].raw_len();
            self.rows[self.cy - 1].append_bytes(&merged);
            self.touch(self.cy - 1);
            self.delete_row(self.cy);
            self.cy -= 1;
            self.cx = prev_len;
            self.dirty += 1;
        }
    }

    /// Split the current row at the cursor (newline insertion). Cursor moves
    /// to the start of the following row.
    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.insert_row(self.cy, Vec::new());
        } else {
            let tail = self.rows[self.cy].split_off(self.cx);
            self.touch(self.cy);
            self.insert_row(self.cy + 1, tail);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Serialize every row's raw bytes joined by a single `\n` each. Saving
    /// normalizes line endings regardless of what was read.
    pub fn rows_to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.rows.iter().map(|r| r.raw_len() + 1).sum());
        for row in &self.rows {
            out.extend_from_slice(row.raw());
            out.push(b'\n');
        }
        out
    }

    /// Write the whole buffer to the current file name. Returns the byte
    /// count written; on failure the buffer and dirty counter are untouched.
    pub fn save(&mut self) -> std::result::Result<usize, SaveError> {
        let path = self.file_name.clone().ok_or(SaveError::NoFileName)?;
        let bytes = self.rows_to_bytes();
        std::fs::write(&path, &bytes)?;
        self.dirty = 0;
        info!(target: "io", file = %path.display(), bytes = bytes.len(), "file_saved");
        Ok(bytes.len())
    }

    // Cursor movement. Vertical moves snap the column to the target row's
    // length afterwards.

    pub fn move_left(&mut self) {
        if self.cx != 0 {
            self.cx -= 1;
        } else if self.cy > 0 {
            self.cy -= 1;
            self.cx = self.rows[self.cy].raw_len();
        }
    }

    pub fn move_right(&mut self) {
        match self.rows.get(self.cy) {
            Some(row) if self.cx < row.raw_len() => self.cx += 1,
            Some(row) if self.cx == row.raw_len() => {
                self.cy += 1;
                self.cx = 0;
            }
            _ => {}
        }
    }

    pub fn move_up(&mut self) {
        if self.cy != 0 {
            self.cy -= 1;
        }
        self.snap_cursor_column();
    }

    pub fn move_down(&mut self) {
        if self.cy < self.rows.len() {
            self.cy += 1;
        }
        self.snap_cursor_column();
    }

    fn snap_cursor_column(&mut self) {
        let len = self.rows.get(self.cy).map_or(0, Row::raw_len);
        if self.cx > len {
            self.cx = len;
        }
    }

    /// Recompute `rx` from the cursor and clamp both viewport offsets so the
    /// cursor stays inside the visible window.
    pub fn scroll(&mut self, text_rows: usize, text_cols: usize) {
        self.rx = match self.rows.get(self.cy) {
            Some(row) => row.cx_to_rx(self.cx),
            None => 0,
        };

        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if text_rows > 0 && self.cy >= self.row_offset + text_rows {
            self.row_offset = self.cy - text_rows + 1;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if text_cols > 0 && self.rx >= self.col_offset + text_cols {
            self.col_offset = self.rx - text_cols + 1;
        }
    }

    /// Post a transient status message; the renderer drops it after
    /// [`STATUS_MESSAGE_TTL`].
    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "runtime", %message, "status_message");
        self.status = Some((message, Instant::now()));
    }

    /// The status message, if it has not expired at `now`.
    pub fn visible_status(&self, now: Instant) -> Option<&str> {
        match &self.status {
            Some((message, posted)) if now.duration_since(*posted) < STATUS_MESSAGE_TTL => {
                Some(message)
            }
            _ => None,
        }
    }
}
