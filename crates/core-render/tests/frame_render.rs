//! Frame-byte assertions: the renderer's output is inspected as the raw
//! escape-sequenced stream it would hand to the terminal.

use core_render::{Screen, render_frame};
use core_state::{Document, STATUS_MESSAGE_TTL};
use std::time::Instant;

fn frame_string(doc: &mut Document, screen: Screen, now: Instant) -> String {
    let frame = render_frame(doc, screen, now).unwrap();
    String::from_utf8_lossy(frame.as_bytes()).into_owned()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.match_indices(needle).count()
}

#[test]
fn frame_hides_homes_and_shows_cursor() {
    let mut doc = Document::from_bytes(b"hello");
    let out = frame_string(&mut doc, Screen::new(40, 10), Instant::now());
    assert!(out.starts_with("\x1b[?25l"), "frame starts by hiding the cursor");
    assert!(out.contains("\x1b[1;1H"), "cursor homed before drawing");
    assert!(out.ends_with("\x1b[?25h"), "frame ends by showing the cursor");
}

#[test]
fn welcome_banner_only_on_empty_untitled_buffer() {
    let mut doc = Document::new();
    let out = frame_string(&mut doc, Screen::new(60, 12), Instant::now());
    assert!(out.contains("kiln editor -- version"));

    let mut doc = Document::from_bytes(b"content");
    let out = frame_string(&mut doc, Screen::new(60, 12), Instant::now());
    assert!(!out.contains("kiln editor"));

    // A named-but-empty buffer gets placeholders, not the banner.
    let mut doc = Document::new();
    doc.set_file_name("empty.txt".into());
    let out = frame_string(&mut doc, Screen::new(60, 12), Instant::now());
    assert!(!out.contains("kiln editor"));
}

#[test]
fn rows_past_end_get_placeholders() {
    let mut doc = Document::from_bytes(b"only line");
    let out = frame_string(&mut doc, Screen::new(40, 10), Instant::now());
    // 8 text rows, 1 data row, 7 placeholders.
    assert_eq!(count(&out, "*"), 7);
    assert!(out.contains("only line"));
}

#[test]
fn color_changes_only_at_tag_boundaries() {
    let mut doc = Document::from_bytes(b"int x;");
    doc.set_file_name("main.c".into());
    let out = frame_string(&mut doc, Screen::new(40, 10), Instant::now());
    // One DarkGreen run for the type keyword, then a reset for the normal
    // tail, then the trailing per-line reset.
    assert_eq!(count(&out, "\x1b[38;5;2m"), 1, "single keyword span: {out:?}");
    assert!(out.contains("\x1b[39m"));
    assert!(out.contains("int"));
    assert!(out.contains("x;"));
}

#[test]
fn comment_row_renders_in_comment_color() {
    let mut doc = Document::from_bytes(b"int x;\n// done");
    doc.set_file_name("main.c".into());
    let out = frame_string(&mut doc, Screen::new(40, 10), Instant::now());
    assert_eq!(count(&out, "\x1b[38;5;6m"), 1, "one DarkCyan run for the comment");
    assert!(out.contains("// done"));
}

#[test]
fn status_bar_is_reverse_video_and_names_the_buffer() {
    let mut doc = Document::from_bytes(b"x");
    doc.set_file_name("main.c".into());
    let out = frame_string(&mut doc, Screen::new(60, 10), Instant::now());
    let reverse_at = out.find("\x1b[7m").expect("reverse video on");
    let reset_at = out.rfind("\x1b[0m").expect("attributes reset after bar");
    assert!(reverse_at < reset_at);
    assert!(out.contains("main.c - 1 lines"));
    assert!(out.contains("c | 1/1"));
}

#[test]
fn message_bar_honors_expiry_window() {
    let mut doc = Document::from_bytes(b"x");
    doc.set_status("HELP: Ctrl-S = save");
    let posted = Instant::now();
    let out = frame_string(&mut doc, Screen::new(60, 10), posted);
    assert!(out.contains("HELP: Ctrl-S = save"));
    let out = frame_string(&mut doc, Screen::new(60, 10), posted + STATUS_MESSAGE_TTL);
    assert!(!out.contains("HELP"));
}

#[test]
fn cursor_lands_at_render_position() {
    let mut doc = Document::from_bytes(b"\tabc");
    doc.cx = 1; // after the tab: render column 8
    doc.cy = 0;
    let out = frame_string(&mut doc, Screen::new(60, 10), Instant::now());
    // MoveTo is 1-based in the emitted sequence: row 1, column 9.
    assert!(out.ends_with("\x1b[1;9H\x1b[?25h"), "tail: {:?}", &out[out.len() - 20..]);
}

#[test]
fn horizontal_window_slices_long_rows() {
    let mut doc = Document::from_bytes(b"0123456789abcdefghij");
    doc.cx = 19;
    let screen = Screen::new(10, 10);
    let out = frame_string(&mut doc, screen, Instant::now());
    assert!(out.contains("abcdefghij"), "window slides to the cursor");
    assert!(!out.contains("0123456789"), "left edge scrolled out");
}
