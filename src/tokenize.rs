//! List tokenizer: turns raw flag occurrences into list items.
//!
//! Three disciplines are supported, selected per flag with [`ListMode`]:
//!
//! - [`Verbatim`](ListMode::Verbatim) keeps every occurrence as one item,
//!   quotes and commas included. Repeating the flag appends.
//! - [`CommaSeparated`](ListMode::CommaSeparated) splits a single occurrence
//!   on `,`. Commas inside quotes still split; only tokens wrapped in quotes on
//!   both ends lose one quote on each side.
//! - [`FileCommaSeparated`](ListMode::FileCommaSeparated) reads the lines of
//!   the named file, or falls back to comma splitting when no such file exists.

use std::path::Path;

/// How a list flag turns raw text into items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListMode {
    /// One item per occurrence, unmodified.
    #[default]
    Verbatim,
    /// Split the occurrence on commas, stripping fully wrapping quotes.
    CommaSeparated,
    /// Lines of an existing file, else comma-separated.
    FileCommaSeparated,
}

impl ListMode {
    /// Whether a new occurrence replaces the whole list instead of appending.
    pub fn replaces_on_set(self) -> bool {
        !matches!(self, ListMode::Verbatim)
    }
}

/// Source of file lines for [`ListMode::FileCommaSeparated`].
pub trait LineSource {
    /// Lines of `path` if it is an existing readable file, `None` otherwise.
    fn read_lines(&self, path: &Path) -> Option<Vec<String>>;
}

/// Reads lines from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLineSource;

impl LineSource for FsLineSource {
    fn read_lines(&self, path: &Path) -> Option<Vec<String>> {
        if !path.is_file() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content.lines().map(str::to_string).collect()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "list file unreadable, splitting on commas");
                None
            }
        }
    }
}

/// Tokenize raw occurrences under `mode`.
///
/// Comma and file modes only look at the last occurrence, since each new
/// occurrence overwrites the list.
pub fn tokenize<S: AsRef<str>>(
    mode: ListMode,
    occurrences: &[S],
    lines: &impl LineSource,
) -> Vec<String> {
    match mode {
        ListMode::Verbatim => occurrences
            .iter()
            .map(|occ| occ.as_ref().to_string())
            .collect(),
        ListMode::CommaSeparated => occurrences
            .last()
            .map(|occ| split_commas(occ.as_ref()))
            .unwrap_or_default(),
        ListMode::FileCommaSeparated => match occurrences.last() {
            Some(occ) => {
                let raw = occ.as_ref();
                lines
                    .read_lines(Path::new(raw))
                    .unwrap_or_else(|| split_commas(raw))
            }
            None => Vec::new(),
        },
    }
}

/// Tokenize a single occurrence against the real filesystem.
pub fn tokenize_one(mode: ListMode, raw: &str) -> Vec<String> {
    tokenize(mode, &[raw], &FsLineSource)
}

fn split_commas(raw: &str) -> Vec<String> {
    raw.split(',').map(strip_wrapping_quotes).collect()
}

fn strip_wrapping_quotes(token: &str) -> String {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
