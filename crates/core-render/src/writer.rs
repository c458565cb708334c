//! Owned, amortized-growth frame buffer.
//!
//! Every escape sequence and text run for one frame is queued into a single
//! byte vector and emitted with one `write_all`, so no sequence is ever
//! partially written and the terminal never shows a half-painted frame.

use anyhow::Result;
use std::io::{Write, stdout};

#[derive(Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw frame bytes, for tests that inspect the emitted stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// One-shot atomic flush to stdout; consumes the frame.
    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        out.write_all(&self.buf)?;
        out.flush()?;
        Ok(())
    }
}

// `crossterm::queue!` targets any `io::Write`, which lets the renderer queue
// commands straight into the frame bytes.
impl Write for FrameBuffer {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
