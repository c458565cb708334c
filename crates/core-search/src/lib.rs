//! Incremental, cancelable substring search with a non-destructive match
//! overlay.
//!
//! The prompt loop drives an implementation of [`QueryObserver`] once per
//! query input event. [`SearchEngine`] is the interesting implementation;
//! save-as style prompts use [`NoopObserver`].
//!
//! The overlay contract: before anything else, each step restores the
//! previous match row's highlight tags from a snapshot taken when the overlay
//! was applied, so canceling a search can never leave `Match` tags behind.

use core_state::Document;
use core_text::Highlight;
use tracing::debug;

/// Distilled query input event, mapped from the logical key by the prompt
/// loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEvent {
    /// Enter: keep the current cursor position and end the prompt.
    Commit,
    /// Escape: end the prompt; the caller restores saved cursor/viewport.
    Cancel,
    /// Arrow right/down: continue forward from the last match.
    Next,
    /// Arrow left/up: continue backward from the last match.
    Prev,
    /// Any other change to the query text.
    Edited,
}

/// Strategy invoked by the prompt loop after every query change.
pub trait QueryObserver {
    fn on_query(&mut self, doc: &mut Document, query: &str, event: QueryEvent);
}

/// Observer for prompts that have no per-keystroke behavior (save-as).
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn on_query(&mut self, _doc: &mut Document, _query: &str, _event: QueryEvent) {}
}

struct SavedHighlight {
    row: usize,
    tags: Vec<Highlight>,
}

/// Wrapping incremental search over document rows.
#[derive(Default)]
pub struct SearchEngine {
    last_match: Option<usize>,
    forward: bool,
    saved: Option<SavedHighlight>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            last_match: None,
            forward: true,
            saved: None,
        }
    }

    /// Put back the snapshotted highlight tags of the previously matched row.
    fn restore_overlay(&mut self, doc: &mut Document) {
        if let Some(saved) = self.saved.take() {
            if let Some(row) = doc.row_mut(saved.row) {
                let (_, tags) = row.render_and_highlight_mut();
                if tags.len() == saved.tags.len() {
                    tags.copy_from_slice(&saved.tags);
                }
            }
        }
    }
}

impl QueryObserver for SearchEngine {
    fn on_query(&mut self, doc: &mut Document, query: &str, event: QueryEvent) {
        self.restore_overlay(doc);

        match event {
            QueryEvent::Commit | QueryEvent::Cancel => {
                self.last_match = None;
                self.forward = true;
                return;
            }
            QueryEvent::Next => self.forward = true,
            QueryEvent::Prev => self.forward = false,
            QueryEvent::Edited => {
                self.last_match = None;
                self.forward = true;
            }
        }

        if self.last_match.is_none() {
            self.forward = true;
        }
        if query.is_empty() || doc.num_rows() == 0 {
            return;
        }

        let needle = query.as_bytes();
        let num_rows = doc.num_rows();
        let mut current = self.last_match.map_or(-1i64, |r| r as i64);
        // At most one full circular pass over the row range.
        for _ in 0..num_rows {
            current += if self.forward { 1 } else { -1 };
            if current == -1 {
                current = num_rows as i64 - 1;
            } else if current == num_rows as i64 {
                current = 0;
            }
            let at = current as usize;

            let hit = doc.row(at).and_then(|row| {
                row.render()
                    .windows(needle.len())
                    .position(|window| window == needle)
            });
            let Some(offset) = hit else { continue };

            debug!(target: "search", row = at, offset, "match");
            self.last_match = Some(at);
            doc.cy = at;
            doc.cx = doc.row(at).map_or(0, |row| row.rx_to_cx(offset));
            // Park the offset past the end; the next scroll re-clamps and
            // brings the match row into view.
            doc.row_offset = doc.num_rows();

            if let Some(row) = doc.row_mut(at) {
                let (_, tags) = row.render_and_highlight_mut();
                self.saved = Some(SavedHighlight {
                    row: at,
                    tags: tags.to_vec(),
                });
                for tag in &mut tags[offset..offset + needle.len()] {
                    *tag = Highlight::Match;
                }
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Document;
    use core_text::Highlight as H;

    fn doc_abc() -> Document {
        Document::from_bytes(b"abc\nxbc\nabx")
    }

    #[test]
    fn forward_search_wraps_circularly() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "b", QueryEvent::Edited);
        assert_eq!(doc.cy, 0);
        let mut visited = vec![doc.cy];
        for _ in 0..5 {
            engine.on_query(&mut doc, "b", QueryEvent::Next);
            visited.push(doc.cy);
        }
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn backward_search_wraps_the_other_way() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "b", QueryEvent::Edited);
        assert_eq!(doc.cy, 0);
        engine.on_query(&mut doc, "b", QueryEvent::Prev);
        assert_eq!(doc.cy, 2);
        engine.on_query(&mut doc, "b", QueryEvent::Prev);
        assert_eq!(doc.cy, 1);
    }

    #[test]
    fn editing_query_restarts_forward_from_last_match() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "b", QueryEvent::Edited);
        engine.on_query(&mut doc, "b", QueryEvent::Next);
        assert_eq!(doc.cy, 1);
        // Query edit resets the anchor; scan starts from row 0 again.
        engine.on_query(&mut doc, "bx", QueryEvent::Edited);
        assert_eq!(doc.cy, 2, "only row 2 contains bx");
    }

    #[test]
    fn no_match_leaves_cursor_and_viewport_alone() {
        let mut doc = doc_abc();
        doc.cy = 1;
        doc.cx = 2;
        doc.row_offset = 1;
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "zzz", QueryEvent::Edited);
        assert_eq!((doc.cx, doc.cy, doc.row_offset), (2, 1, 1));
    }

    #[test]
    fn match_column_maps_through_tab_expansion() {
        let mut doc = Document::from_bytes(b"\tneedle");
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "needle", QueryEvent::Edited);
        // Render offset 8 maps back to raw column 1.
        assert_eq!(doc.cx, 1);
        assert_eq!(doc.cy, 0);
    }

    #[test]
    fn match_forces_viewport_reclamp() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "x", QueryEvent::Edited);
        assert_eq!(doc.row_offset, doc.num_rows());
        doc.scroll(2, 80);
        assert!(doc.row_offset <= doc.cy);
    }

    #[test]
    fn overlay_marks_exact_span_and_cancel_restores_it() {
        let mut doc = Document::from_bytes(b"int x;");
        doc.set_file_name("main.c".into());
        let before = doc.row(0).unwrap().highlight().to_vec();
        assert_eq!(before[0], H::Keyword2);

        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "x", QueryEvent::Edited);
        let during = doc.row(0).unwrap().highlight();
        assert_eq!(during[4], H::Match);
        assert_eq!(during[0], H::Keyword2, "overlay touches only the span");

        engine.on_query(&mut doc, "x", QueryEvent::Cancel);
        assert_eq!(doc.row(0).unwrap().highlight(), &before[..]);
    }

    #[test]
    fn stepping_restores_previous_overlay_before_applying_next() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "b", QueryEvent::Edited);
        assert_eq!(doc.row(0).unwrap().highlight()[1], H::Match);
        engine.on_query(&mut doc, "b", QueryEvent::Next);
        assert_eq!(doc.row(0).unwrap().highlight()[1], H::Normal);
        assert_eq!(doc.row(1).unwrap().highlight()[1], H::Match);
    }

    #[test]
    fn commit_keeps_cursor_at_match() {
        let mut doc = doc_abc();
        let mut engine = SearchEngine::new();
        engine.on_query(&mut doc, "xb", QueryEvent::Edited);
        assert_eq!((doc.cx, doc.cy), (0, 1));
        engine.on_query(&mut doc, "xb", QueryEvent::Commit);
        assert_eq!((doc.cx, doc.cy), (0, 1));
        assert_eq!(doc.row(1).unwrap().highlight()[0], H::Normal);
    }
}
