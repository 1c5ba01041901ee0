use serde::{Deserialize, Serialize};
use crate::common::constants::{CONTINUATION_INDENT, FIELD_SEPARATOR, MAX_LINE_WIDTH};

/// Line layout used when writing tag fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldFormat {
    /// Maximum characters per physical line.
    pub width: usize,
    /// Spaces at the start of each continuation line.
    pub indent: usize,
}

impl Default for FieldFormat {
    fn default() -> Self {
        Self {
            width: MAX_LINE_WIDTH,
            indent: CONTINUATION_INDENT,
        }
    }
}

/// Formats `key: value` wrapped at 79 columns with a three-space indent.
pub fn format_field(key: &str, value: &str) -> String {
    format_field_with(key, value, &FieldFormat::default())
}

/// Formats one tag field, wrapping the value's words so that no line grows
/// past `format.width`.
///
/// Words are never split. A word that does not fit even on a fresh
/// continuation line is still written whole on that line. When the first
/// word does not fit after the key, the break comes right after `key: `.
pub fn format_field_with(key: &str, value: &str, format: &FieldFormat) -> String {
    let mut out = format!("{key}{FIELD_SEPARATOR}");
    let mut line_len = out.chars().count();
    let mut line_has_word = false;
    // 当前行只有续行缩进时不再换行
    let mut line_is_indent = false;

    for word in value.split_whitespace() {
        let word_len = word.chars().count();
        let separator = usize::from(line_has_word);

        if !line_is_indent && line_len + separator + word_len > format.width {
            out.push('\n');
            out.extend(std::iter::repeat_n(' ', format.indent));
            line_len = format.indent;
            line_has_word = false;
            line_is_indent = true;
        }
        if line_has_word {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word_len;
        line_has_word = true;
        line_is_indent = false;
    }
    out
}
