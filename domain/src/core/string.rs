//! String utilities for the domain layer.

/// Shorten a string to at most `max_len` bytes, ending in `...` when cut
///
/// The cut always lands on a UTF-8 character boundary. Used to keep provider
/// error bodies and log lines readable.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
