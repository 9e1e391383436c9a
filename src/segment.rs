//! Explicit page-break markers.

/// Marker that forces a new page when it appears anywhere in the input.
pub const DEFAULT_MARKER: &str = "[[PAGE_BREAK]]";

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split `text` at every occurrence of `marker`.
///
/// The marker itself is dropped and the pieces are returned verbatim, so
/// joining them with the marker reproduces the input exactly. An empty
/// marker disables splitting.
pub fn split_segments<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    if marker.is_empty() {
        return vec![text];
    }
    text.split(marker).collect()
}
