use std::path::Path;

use docdelta_core::{EngineConfig, ParsedDocument};
use unicode_width::UnicodeWidthStr;

use crate::CliError;

/// Engine config from `--config`, or defaults when no file is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    EngineConfig::from_toml(&text)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))
}

pub(crate) fn load_document(path: &Path, config: &EngineConfig) -> Result<ParsedDocument, CliError> {
    tracing::info!(path = %path.display(), "parsing document");
    docdelta_io::parse_file(path, config).map_err(|e| CliError::unreadable(path, e))
}

/// Serialize to pretty JSON and write it to `path`.
pub(crate) fn write_json_file<T: serde::Serialize>(value: &T, path: &Path) -> Result<(), CliError> {
    let json = to_json(value)?;
    std::fs::write(path, json)
        .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::output(format!("JSON serialization error: {e}")))
}

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .find(|ch| unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    // Stop at width - 2 to leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_display("National", 10), "National");
        assert_eq!(truncate_display("", 0), "");
    }

    #[test]
    fn truncate_cuts_long_header() {
        assert_eq!(truncate_display("Support Item Number", 9), "Support..");
        assert_eq!(truncate_display("abc", 2), "a");
    }

    #[test]
    fn truncate_cjk_boundary() {
        // "世界你好" is 8 display cols; a budget of 4 fits "世界"
        let s = "\u{4e16}\u{754c}\u{4f60}\u{597d}";
        let t = truncate_display(s, 6);
        assert_eq!(t, "\u{4e16}\u{754c}..");
        assert!(display_width(&t) <= 6);
    }

    #[test]
    fn pad_right_pads_and_truncates() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
    }

    #[test]
    fn missing_config_path_is_usage_error() {
        let err = load_config(Some(Path::new("/nonexistent/docdelta.toml"))).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
