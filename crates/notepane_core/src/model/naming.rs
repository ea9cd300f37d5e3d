//! Content-derived note file names.
//!
//! # Responsibility
//! - Map the first line of a note to a filesystem-safe base name.
//! - Build final file names (extension, collision suffix).
//!
//! # Invariants
//! - `sanitize` is pure and idempotent.
//! - `sanitize` output is never empty and never starts or ends with `_`.
//! - `sanitize` output fits in `MAX_BASE_NAME_BYTES`, leaving room for a
//!   collision suffix and the extension within common 255-byte limits.
//! - Collision suffixes are inserted before the extension (`a_1.txt`).

use once_cell::sync::Lazy;
use regex::Regex;

/// Extension appended to names given without one.
pub const NOTE_EXTENSION: &str = "txt";
/// Base name used when the first line has nothing usable.
pub const FALLBACK_BASE_NAME: &str = "new_note";
/// Upper bound for a sanitized base name, in bytes.
pub const MAX_BASE_NAME_BYTES: usize = 200;

static UNSAFE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|\s]+"#).expect("valid unsafe-run regex"));

/// Maps arbitrary first-line text to a filesystem-safe base name.
///
/// Runs of `\ / : * ? " < > |` and whitespace collapse into one `_`, and
/// leading/trailing underscores are stripped. Long names are cut at a char
/// boundary. Returns [`FALLBACK_BASE_NAME`] when nothing remains.
pub fn sanitize(first_line: &str) -> String {
    let replaced = UNSAFE_RUN_RE.replace_all(first_line.trim(), "_");
    let stripped = truncate_at_char_boundary(replaced.trim_matches('_'), MAX_BASE_NAME_BYTES)
        .trim_end_matches('_');
    if stripped.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        stripped.to_string()
    }
}

/// Returns the first line of `content`, or `""` when it starts with a line
/// break. Unicode line and paragraph separators count as breaks.
pub fn first_line(content: &str) -> &str {
    content.split(is_line_break).next().unwrap_or("")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn truncate_at_char_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Proposed file name for a note body: sanitized first line plus `.txt`.
///
/// The extension is always appended so a first line such as `v1.2` does not
/// turn `2` into the extension.
pub fn proposed_file_name(content: &str) -> String {
    format!("{}.{NOTE_EXTENSION}", sanitize(first_line(content)))
}

/// Appends the default extension when `name` has none.
pub fn note_file_name(name: &str) -> String {
    match split_extension(name) {
        (_, Some(_)) => name.to_string(),
        (stem, None) => format!("{stem}.{NOTE_EXTENSION}"),
    }
}

/// Inserts a numeric suffix before the extension: `draft.txt` → `draft_2.txt`.
pub fn suffixed_file_name(file_name: &str, counter: u32) -> String {
    match split_extension(file_name) {
        (stem, Some(ext)) => format!("{stem}_{counter}.{ext}"),
        (stem, None) => format!("{stem}_{counter}"),
    }
}

// Leading dots belong to the stem so `.profile` has no extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        first_line, note_file_name, proposed_file_name, sanitize, split_extension,
        suffixed_file_name, MAX_BASE_NAME_BYTES,
    };

    #[test]
    fn first_line_handles_leading_newline_and_empty_input() {
        assert_eq!(first_line("title\nbody"), "title");
        assert_eq!(first_line("\nbody"), "");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("title\r\nbody"), "title");
    }

    #[test]
    fn first_line_stops_at_form_feed_and_unicode_separators() {
        assert_eq!(first_line("title\x0cpage two"), "title");
        assert_eq!(first_line("title\u{2028}next"), "title");
        assert_eq!(proposed_file_name("Plan\x0bdetails"), "Plan.txt");
    }

    #[test]
    fn long_first_line_is_truncated_at_char_boundary() {
        let long = "a".repeat(300);
        let name = sanitize(&long);
        assert_eq!(name.len(), MAX_BASE_NAME_BYTES);
        assert_eq!(sanitize(&name), name);

        let wide = "é".repeat(150);
        let name = sanitize(&wide);
        assert!(name.len() <= MAX_BASE_NAME_BYTES);
        assert!(name.chars().all(|c| c == 'é'));

        let cut_on_separator = format!("{} tail", "b".repeat(MAX_BASE_NAME_BYTES - 1));
        assert!(!sanitize(&cut_on_separator).ends_with('_'));
    }

    #[test]
    fn proposed_file_name_always_appends_extension() {
        assert_eq!(proposed_file_name("Release v1.2\nnotes"), "Release_v1.2.txt");
        assert_eq!(proposed_file_name("\nbody only"), "new_note.txt");
    }

    #[test]
    fn note_file_name_only_appends_missing_extension() {
        assert_eq!(note_file_name("draft"), "draft.txt");
        assert_eq!(note_file_name("draft.md"), "draft.md");
        assert_eq!(note_file_name("draft."), "draft..txt");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(suffixed_file_name("draft.txt", 1), "draft_1.txt");
        assert_eq!(suffixed_file_name("v1.2.txt", 3), "v1.2_3.txt");
        assert_eq!(suffixed_file_name("README", 2), "README_2");
    }

    #[test]
    fn dotfiles_have_no_extension() {
        assert_eq!(split_extension(".profile"), (".profile", None));
    }
}
