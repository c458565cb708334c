//! Syntax profiles and the single-pass row classifier.
//!
//! The classifier runs over one row's render bytes and rewrites its highlight
//! tags in place. All scan state (separator flag, open string quote, previous
//! tag) resets at the start of every row; there is intentionally no cross-row
//! persistence, so multi-line comments and strings are not recognized.
//!
//! Profiles live in a static read-only registry. A document holds at most a
//! borrowed reference to one of them, reselected whenever its file name
//! changes.

use bitflags::bitflags;
use core_text::{Highlight, Row};
use tracing::debug;

bitflags! {
    /// Per-profile feature switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// Static description of one file type.
///
/// Keyword entries ending in `|` are type keywords: the sentinel is stripped
/// before comparison and the span classifies as `Keyword2` instead of
/// `Keyword1`.
#[derive(Debug)]
pub struct SyntaxProfile {
    pub file_type: &'static str,
    /// `.`-prefixed patterns match the file extension exactly; anything else
    /// matches as a substring of the file name.
    pub file_match: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub comment_start: Option<&'static str>,
    pub flags: SyntaxFlags,
}

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else",
    "struct", "union", "typedef", "static", "enum", "class", "case",
    // Type keywords carry the `|` sentinel.
    "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|",
    "void|",
];

const RUST_KEYWORDS: &[&str] = &[
    "fn", "let", "if", "else", "match", "while", "for", "loop", "return",
    "struct", "enum", "impl", "trait", "use", "mod", "pub", "mut", "ref",
    "move", "where", "unsafe", "break", "continue", "static", "const", "as",
    "in", "dyn",
    "u8|", "u16|", "u32|", "u64|", "usize|", "i8|", "i16|", "i32|", "i64|",
    "isize|", "f32|", "f64|", "bool|", "char|", "str|", "String|",
];

/// The profile registry. Selection scans in order; first match wins.
pub static PROFILES: &[SyntaxProfile] = &[
    SyntaxProfile {
        file_type: "c",
        file_match: &[".c", ".h", ".cpp"],
        keywords: C_KEYWORDS,
        comment_start: Some("//"),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxProfile {
        file_type: "rust",
        file_match: &[".rs"],
        keywords: RUST_KEYWORDS,
        comment_start: Some("//"),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];

/// Pick a profile for `file_name`, or `None` to leave highlighting disabled.
pub fn select_profile(file_name: &str) -> Option<&'static SyntaxProfile> {
    let ext = file_name.rfind('.').map(|dot| &file_name[dot..]);
    for profile in PROFILES {
        for pattern in profile.file_match {
            let is_ext = pattern.starts_with('.');
            let hit = if is_ext {
                ext == Some(*pattern)
            } else {
                file_name.contains(pattern)
            };
            if hit {
                debug!(target: "syntax", file = file_name, file_type = profile.file_type, "profile_selected");
                return Some(profile);
            }
        }
    }
    None
}

/// Token boundary test: whitespace, NUL, or a fixed punctuation set.
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0 || b",.()+-/*=~%<>[];".contains(&byte)
}

/// Reclassify one row's highlight tags from its render bytes.
pub fn highlight_row(row: &mut Row, profile: &SyntaxProfile) {
    let (render, highlight) = row.render_and_highlight_mut();
    highlight.fill(Highlight::Normal);

    let comment_start = profile.comment_start.map(str::as_bytes);
    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let byte = render[i];
        let prev_highlight = if i > 0 {
            highlight[i - 1]
        } else {
            Highlight::Normal
        };

        if in_string.is_none() {
            if let Some(marker) = comment_start {
                if !marker.is_empty() && render[i..].starts_with(marker) {
                    for tag in &mut highlight[i..] {
                        *tag = Highlight::Comment;
                    }
                    break;
                }
            }
        }

        if profile.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                highlight[i] = Highlight::String;
                if byte == b'\\' && i + 1 < render.len() {
                    highlight[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if byte == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if byte == b'"' || byte == b'\'' {
                in_string = Some(byte);
                highlight[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if profile.flags.contains(SyntaxFlags::NUMBERS)
            && ((byte.is_ascii_digit() && (prev_sep || prev_highlight == Highlight::Number))
                || (byte == b'.' && prev_highlight == Highlight::Number))
        {
            highlight[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some(len) = classify_keyword(render, highlight, i, profile.keywords) {
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(byte);
        i += 1;
    }
}

/// Try every keyword at position `i`; on an exact token match (the byte after
/// the keyword is a separator or the row end) tag the span and return its
/// length.
fn classify_keyword(
    render: &[u8],
    highlight: &mut [Highlight],
    i: usize,
    keywords: &[&str],
) -> Option<usize> {
    for keyword in keywords {
        let (word, tag) = match keyword.strip_suffix('|') {
            Some(word) => (word.as_bytes(), Highlight::Keyword2),
            None => (keyword.as_bytes(), Highlight::Keyword1),
        };
        if !render[i..].starts_with(word) {
            continue;
        }
        let after = i + word.len();
        let bounded = render.get(after).copied().map_or(true, is_separator);
        if bounded {
            for tag_slot in &mut highlight[i..after] {
                *tag_slot = tag;
            }
            return Some(word.len());
        }
    }
    None
}
