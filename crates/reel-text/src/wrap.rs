//! Greedy word wrapping for text burned into frames.

/// Line width used for subtitles and thumbnail titles.
pub const SUBTITLE_LINE_CHARS: usize = 40;

/// Wrap `text` into at most `max_lines` lines.
///
/// A word joins the current line while the line plus the word stays under
/// `line_chars` characters. Words left over once the last line has started are
/// dropped.
pub fn wrap_words(text: &str, line_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() < line_chars {
            current.push_str(word);
            current.push(' ');
            continue;
        }

        if !current.is_empty() {
            lines.push(current.trim_end().to_string());
        }
        current = format!("{word} ");
        if lines.len() >= max_lines.saturating_sub(1) {
            break;
        }
    }

    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }

    lines
}
