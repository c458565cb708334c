//! The interactive event loop: one logical key in, one full frame out.
//!
//! `Editor` owns the document and the current screen geometry and maps each
//! [`Key`] to a document operation. Prompts (save-as, search) run a nested
//! loop over the same key source, feeding each query change to a
//! [`QueryObserver`] so the search engine can react per keystroke.

use anyhow::Result;
use core_input::{Key, KeySource};
use core_render::{Screen, render_frame};
use core_search::{NoopObserver, QueryEvent, QueryObserver, SearchEngine};
use core_state::Document;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// What the caller should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub struct Editor {
    pub doc: Document,
    pub screen: Screen,
    /// Configured number of extra Ctrl-Q presses a dirty buffer demands.
    quit_warnings: u8,
    /// Remaining presses before a dirty quit goes through; reset by any
    /// other key.
    quit_countdown: u8,
}

impl Editor {
    pub fn new(doc: Document, screen: Screen, quit_warnings: u8) -> Self {
        Self {
            doc,
            screen,
            quit_warnings,
            quit_countdown: quit_warnings,
        }
    }

    /// Draw one complete frame to the terminal.
    pub fn refresh(&mut self) -> Result<()> {
        render_frame(&mut self.doc, self.screen, Instant::now())?.flush()
    }

    /// Block on keys until the user quits.
    pub fn run(&mut self, keys: &mut impl KeySource) -> Result<()> {
        loop {
            self.refresh()?;
            let key = keys.next_key()?;
            if self.process_key(key, keys)? == Outcome::Quit {
                info!(target: "runtime", "quit");
                return Ok(());
            }
        }
    }

    /// Handle one logical key. `keys` is needed because save and find may
    /// open a nested prompt over the same source.
    pub fn process_key(&mut self, key: Key, keys: &mut dyn KeySource) -> Result<Outcome> {
        match key {
            Key::Ctrl('q') => {
                if self.doc.is_dirty() && self.quit_countdown > 0 {
                    self.doc.set_status(format!(
                        "WARNING!!! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_countdown
                    ));
                    self.quit_countdown -= 1;
                    // Early return keeps the countdown; every other key
                    // resets it below.
                    return Ok(Outcome::Continue);
                }
                return Ok(Outcome::Quit);
            }
            Key::Ctrl('s') => self.save(keys)?,
            Key::Ctrl('f') => self.find(keys)?,
            Key::Enter => self.doc.insert_newline(),
            Key::Backspace | Key::Ctrl('h') => self.doc.delete_char(),
            Key::Delete => {
                // Forward delete is a move right followed by a backspace,
                // which also merges rows at end of line.
                self.doc.move_right();
                self.doc.delete_char();
            }
            Key::Home => self.doc.cx = 0,
            Key::End => {
                if let Some(row) = self.doc.row(self.doc.cy) {
                    self.doc.cx = row.raw_len();
                }
            }
            Key::PageUp => self.page_move(true),
            Key::PageDown => self.page_move(false),
            Key::Up => self.doc.move_up(),
            Key::Down => self.doc.move_down(),
            Key::Left => self.doc.move_left(),
            Key::Right => self.doc.move_right(),
            Key::Resize(cols, rows) => self.screen = Screen::new(cols, rows),
            // Ctrl-L (legacy refresh) and a bare escape do nothing; the
            // screen is repainted after every key anyway.
            Key::Esc | Key::Ctrl(_) => {}
            Key::Char(c) => self.doc.insert_char(c),
        }
        self.quit_countdown = self.quit_warnings;
        Ok(Outcome::Continue)
    }

    /// Jump the cursor to the window edge, then move a full page of rows.
    fn page_move(&mut self, up: bool) {
        let text_rows = self.screen.text_rows();
        if up {
            self.doc.cy = self.doc.row_offset;
        } else {
            self.doc.cy = self.doc.row_offset + text_rows.saturating_sub(1);
            if self.doc.cy > self.doc.num_rows() {
                self.doc.cy = self.doc.num_rows();
            }
        }
        for _ in 0..text_rows {
            if up {
                self.doc.move_up();
            } else {
                self.doc.move_down();
            }
        }
    }

    /// Line-input prompt on the message bar. `label` contains a `{}`
    /// placeholder for the text typed so far. Returns `None` on cancel.
    fn prompt(
        &mut self,
        keys: &mut dyn KeySource,
        label: &str,
        observer: &mut dyn QueryObserver,
    ) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            self.doc.set_status(label.replace("{}", &buf));
            self.refresh()?;
            match keys.next_key()? {
                Key::Backspace | Key::Ctrl('h') | Key::Delete => {
                    buf.pop();
                    observer.on_query(&mut self.doc, &buf, QueryEvent::Edited);
                }
                Key::Esc => {
                    self.doc.set_status("");
                    observer.on_query(&mut self.doc, &buf, QueryEvent::Cancel);
                    return Ok(None);
                }
                Key::Enter => {
                    if !buf.is_empty() {
                        self.doc.set_status("");
                        observer.on_query(&mut self.doc, &buf, QueryEvent::Commit);
                        return Ok(Some(buf));
                    }
                }
                Key::Right | Key::Down => {
                    observer.on_query(&mut self.doc, &buf, QueryEvent::Next);
                }
                Key::Left | Key::Up => {
                    observer.on_query(&mut self.doc, &buf, QueryEvent::Prev);
                }
                Key::Char(c) if !c.is_control() => {
                    buf.push(c);
                    observer.on_query(&mut self.doc, &buf, QueryEvent::Edited);
                }
                Key::Resize(cols, rows) => self.screen = Screen::new(cols, rows),
                _ => {}
            }
        }
    }

    /// Incremental search. Escape restores the cursor and viewport to where
    /// they were when the prompt opened; Enter keeps the last match.
    fn find(&mut self, keys: &mut dyn KeySource) -> Result<()> {
        let saved = (
            self.doc.cx,
            self.doc.cy,
            self.doc.col_offset,
            self.doc.row_offset,
        );
        let mut engine = SearchEngine::new();
        let query = self.prompt(keys, "Search: {} (Use ESC/Arrows/Enter)", &mut engine)?;
        if query.is_none() {
            (
                self.doc.cx,
                self.doc.cy,
                self.doc.col_offset,
                self.doc.row_offset,
            ) = saved;
        }
        Ok(())
    }

    /// Write the buffer out, prompting for a name first when the buffer has
    /// none. Failures land on the message bar, never abort the editor.
    fn save(&mut self, keys: &mut dyn KeySource) -> Result<()> {
        if self.doc.file_name().is_none() {
            match self.prompt(keys, "Save as: {} (ESC to cancel)", &mut NoopObserver)? {
                Some(name) => self.doc.set_file_name(PathBuf::from(name)),
                None => {
                    self.doc.set_status("Save aborted");
                    return Ok(());
                }
            }
        }
        match self.doc.save() {
            Ok(bytes) => self.doc.set_status(format!("{bytes} bytes written to disk")),
            Err(error) => {
                warn!(target: "io", %error, "save_failed");
                self.doc.set_status(format!("Can't save! I/O error: {error}"));
            }
        }
        Ok(())
    }
}
