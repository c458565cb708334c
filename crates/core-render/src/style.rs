//! Highlight tag to terminal color mapping.

use core_text::Highlight;
use crossterm::style::Color;

/// Pure color lookup; `None` means the terminal's default foreground.
///
/// The match is exhaustive on purpose: adding a `Highlight` variant without
/// deciding its color must fail to compile rather than silently render in
/// the default color.
pub fn color_for(tag: Highlight) -> Option<Color> {
    match tag {
        Highlight::Normal => None,
        Highlight::Comment => Some(Color::DarkCyan),
        Highlight::Keyword1 => Some(Color::DarkBlue),
        Highlight::Keyword2 => Some(Color::DarkGreen),
        Highlight::String => Some(Color::DarkMagenta),
        Highlight::Number => Some(Color::DarkRed),
        Highlight::Match => Some(Color::DarkBlue),
    }
}
