//! Row-level text storage.
//!
//! A `Row` keeps two byte sequences: the raw bytes as typed or loaded, and the
//! render bytes with every tab expanded to the next multiple-of-`TAB_STOP`
//! column. Alongside the render bytes lives one `Highlight` tag per byte.
//!
//! Invariant: any mutation of the raw bytes recomputes the render bytes and
//! resets the highlight tags to `Normal` before control returns to the caller.
//! Re-classification (syntax colors) is layered on top by the owner of the
//! row; this crate stays syntax-agnostic.

/// Fixed tab stop width in render columns.
pub const TAB_STOP: usize = 8;

/// Per-render-byte classification tag.
///
/// Matched exhaustively by the renderer's color table so a new variant cannot
/// silently fall through to the default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    /// Control-flow and structural keywords.
    Keyword1,
    /// Type keywords (marked with a trailing `|` in profile tables).
    Keyword2,
    String,
    Number,
    /// Search match overlay; never produced by the syntax pass.
    Match,
}

/// One document line in its dual raw/render representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    raw: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
}

impl Row {
    /// Build a row from raw bytes (line terminators already stripped).
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            raw: raw.into(),
            render: Vec::new(),
            highlight: Vec::new(),
        };
        row.update_render();
        row
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Render bytes and highlight tags with split borrows, for the syntax
    /// pass and the search overlay which read one while writing the other.
    pub fn render_and_highlight_mut(&mut self) -> (&[u8], &mut [Highlight]) {
        (&self.render, &mut self.highlight)
    }

    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Insert one character's UTF-8 bytes at raw index `at` (clamped to the
    /// row length). Returns the number of bytes inserted so the caller can
    /// advance its cursor.
    pub fn insert_char(&mut self, at: usize, ch: char) -> usize {
        let at = at.min(self.raw.len());
        let mut buf = [0u8; 4];
        let bytes = ch.encode_utf8(&mut buf).as_bytes();
        self.raw.splice(at..at, bytes.iter().copied());
        self.update_render();
        bytes.len()
    }

    /// Remove the raw byte at `at`; no-op when out of range.
    pub fn delete_byte(&mut self, at: usize) {
        if at >= self.raw.len() {
            return;
        }
        self.raw.remove(at);
        self.update_render();
    }

    /// Append raw bytes to the end of the row (row merge after backspace).
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.update_render();
    }

    /// Truncate the raw bytes to `[0, at)` and hand back the tail, used when
    /// splitting a row at the cursor.
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.raw.len());
        let tail = self.raw.split_off(at);
        self.update_render();
        tail
    }

    /// Map a raw byte index to its render column through tab expansion.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &byte in self.raw.iter().take(cx) {
            if byte == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Left inverse of [`cx_to_rx`](Self::cx_to_rx): the smallest raw index
    /// whose cumulative render width exceeds `rx`, clamped to the row length.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &byte) in self.raw.iter().enumerate() {
            if byte == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    /// Recompute the render bytes from the raw bytes and reset every
    /// highlight tag to `Normal`.
    fn update_render(&mut self) {
        self.render.clear();
        for &byte in &self.raw {
            if byte == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(byte);
            }
        }
        self.highlight.clear();
        self.highlight.resize(self.render.len(), Highlight::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_row_renders_unchanged() {
        let row = Row::from_bytes(*b"hello");
        assert_eq!(row.render(), b"hello");
        assert_eq!(row.highlight().len(), 5);
        assert!(row.highlight().iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let row = Row::from_bytes(*b"\tx");
        assert_eq!(row.render(), b"        x");
        let row = Row::from_bytes(*b"ab\tc");
        assert_eq!(row.render(), b"ab      c");
    }

    #[test]
    fn render_length_bounds_hold() {
        let row = Row::from_bytes(*b"a\tb\tc");
        let tabs = 2;
        let n = row.raw_len();
        assert!(row.render_len() >= n);
        assert!(row.render_len() <= n + (TAB_STOP - 1) * tabs);
    }

    #[test]
    fn insert_char_clamps_and_reports_width() {
        let mut row = Row::from_bytes(*b"ac");
        assert_eq!(row.insert_char(1, 'b'), 1);
        assert_eq!(row.raw(), b"abc");
        // Out-of-range insert lands at the end.
        assert_eq!(row.insert_char(99, 'd'), 1);
        assert_eq!(row.raw(), b"abcd");
    }

    #[test]
    fn insert_multibyte_char_reports_utf8_len() {
        let mut row = Row::from_bytes(*b"ab");
        let advanced = row.insert_char(1, 'é');
        assert_eq!(advanced, 'é'.len_utf8());
        assert_eq!(row.raw_len(), 2 + advanced);
    }

    #[test]
    fn delete_byte_out_of_range_is_noop() {
        let mut row = Row::from_bytes(*b"ab");
        row.delete_byte(5);
        assert_eq!(row.raw(), b"ab");
        row.delete_byte(0);
        assert_eq!(row.raw(), b"b");
    }

    #[test]
    fn split_off_truncates_and_returns_tail() {
        let mut row = Row::from_bytes(*b"abcdef");
        let tail = row.split_off(2);
        assert_eq!(row.raw(), b"ab");
        assert_eq!(tail, b"cdef");
        assert_eq!(row.render(), b"ab");
    }

    #[test]
    fn cx_rx_identity_without_tabs() {
        let row = Row::from_bytes(*b"plain text");
        for cx in 0..=row.raw_len() {
            assert_eq!(row.cx_to_rx(cx), cx);
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx);
        }
    }

    #[test]
    fn cx_rx_roundtrip_with_tabs() {
        let row = Row::from_bytes(*b"\ta\tbc\t");
        for cx in 0..=row.raw_len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx);
        }
        // rx values inside a tab run resolve to the tab's raw index.
        assert_eq!(row.rx_to_cx(0), 0);
        assert_eq!(row.rx_to_cx(3), 0);
        assert_eq!(row.rx_to_cx(7), 0);
        assert_eq!(row.rx_to_cx(8), 1);
    }

    #[test]
    fn rx_past_row_end_clamps_to_len() {
        let row = Row::from_bytes(*b"ab\tc");
        assert_eq!(row.rx_to_cx(10_000), row.raw_len());
    }

    #[test]
    fn mutation_resets_highlight_to_normal() {
        let mut row = Row::from_bytes(*b"abc");
        {
            let (_, hl) = row.render_and_highlight_mut();
            hl[0] = Highlight::Keyword1;
        }
        row.insert_char(0, 'x');
        assert!(row.highlight().iter().all(|&h| h == Highlight::Normal));
        assert_eq!(row.highlight().len(), row.render_len());
    }
}
