//! Full-frame terminal rendering.
//!
//! One frame per input event: scroll the viewport, then queue every escape
//! sequence and text run for the visible rows, the reverse-video status bar,
//! the message bar, and the final cursor placement into a [`FrameBuffer`],
//! flushed to the terminal as a single write. Color commands are emitted only
//! at highlight-tag boundaries; a run of `Normal` bytes re-emits the default
//! foreground once, and every text row ends with a reset.

pub mod status;
pub mod style;
pub mod writer;

pub use writer::FrameBuffer;

use anyhow::Result;
use core_state::Document;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::time::Instant;

/// Rows reserved below the text area: status bar and message bar.
pub const STATUS_ROWS: usize = 2;

/// Terminal dimensions as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub cols: u16,
    pub rows: u16,
}

impl Screen {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn text_rows(&self) -> usize {
        (self.rows as usize).saturating_sub(STATUS_ROWS)
    }

    pub fn text_cols(&self) -> usize {
        self.cols as usize
    }
}

/// Produce one complete frame. Scrolling happens here so the cursor is
/// always inside the window the frame draws.
pub fn render_frame(doc: &mut Document, screen: Screen, now: Instant) -> Result<FrameBuffer> {
    doc.scroll(screen.text_rows(), screen.text_cols());

    let mut frame = FrameBuffer::new();
    queue!(frame, Hide, MoveTo(0, 0))?;

    draw_rows(&mut frame, doc, screen)?;
    draw_status_bar(&mut frame, doc, screen)?;
    draw_message_bar(&mut frame, doc, screen, now)?;

    let cursor_x = (doc.rx - doc.col_offset) as u16;
    let cursor_y = (doc.cy - doc.row_offset) as u16;
    queue!(frame, MoveTo(cursor_x, cursor_y), Show)?;
    Ok(frame)
}

fn draw_rows(frame: &mut FrameBuffer, doc: &Document, screen: Screen) -> Result<()> {
    let text_cols = screen.text_cols();
    for y in 0..screen.text_rows() {
        let file_row = y + doc.row_offset;
        if file_row >= doc.num_rows() {
            if doc.num_rows() == 0 && doc.file_name().is_none() && y == screen.text_rows() / 3 {
                draw_welcome(frame, text_cols)?;
            } else {
                queue!(frame, Print("*"))?;
            }
        } else {
            draw_text_row(frame, doc, file_row, text_cols)?;
        }
        queue!(frame, Clear(ClearType::UntilNewLine), Print("\r\n"))?;
    }
    Ok(())
}

fn draw_welcome(frame: &mut FrameBuffer, text_cols: usize) -> Result<()> {
    let banner = format!("kiln editor -- version {}", env!("CARGO_PKG_VERSION"));
    let banner: String = banner.chars().take(text_cols).collect();
    let mut padding = text_cols.saturating_sub(banner.chars().count()) / 2;
    if padding > 0 {
        queue!(frame, Print("*"))?;
        padding -= 1;
    }
    for _ in 0..padding {
        queue!(frame, Print(" "))?;
    }
    queue!(frame, Print(banner))?;
    Ok(())
}

/// Emit one row's visible render-byte window, batching bytes into runs and
/// changing the foreground color only when the highlight tag changes.
fn draw_text_row(
    frame: &mut FrameBuffer,
    doc: &Document,
    file_row: usize,
    text_cols: usize,
) -> Result<()> {
    let row = &doc.rows()[file_row];
    let start = doc.col_offset.min(row.render_len());
    let end = (doc.col_offset + text_cols).min(row.render_len());
    let render = &row.render()[start..end];
    let tags = &row.highlight()[start..end];

    let mut current: Option<Color> = None;
    let mut run: Vec<u8> = Vec::new();
    for (&byte, &tag) in render.iter().zip(tags) {
        let color = style::color_for(tag);
        if color != current {
            flush_run(frame, &mut run)?;
            match color {
                Some(color) => queue!(frame, SetForegroundColor(color))?,
                None => queue!(frame, SetForegroundColor(Color::Reset))?,
            }
            current = color;
        }
        run.push(byte);
    }
    flush_run(frame, &mut run)?;
    queue!(frame, SetForegroundColor(Color::Reset))?;
    Ok(())
}

fn flush_run(frame: &mut FrameBuffer, run: &mut Vec<u8>) -> Result<()> {
    if !run.is_empty() {
        queue!(frame, Print(String::from_utf8_lossy(run)))?;
        run.clear();
    }
    Ok(())
}

fn draw_status_bar(frame: &mut FrameBuffer, doc: &Document, screen: Screen) -> Result<()> {
    let line = status::build_status_line(doc, screen.text_cols());
    queue!(
        frame,
        SetAttribute(Attribute::Reverse),
        Print(line),
        SetAttribute(Attribute::Reset),
        Print("\r\n"),
    )?;
    Ok(())
}

fn draw_message_bar(
    frame: &mut FrameBuffer,
    doc: &Document,
    screen: Screen,
    now: Instant,
) -> Result<()> {
    let line = status::build_message_line(doc, now, screen.text_cols());
    queue!(frame, Clear(ClearType::UntilNewLine), Print(line))?;
    Ok(())
}
