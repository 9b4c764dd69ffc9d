//! Shared utility functions.

use std::borrow::Cow;

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten `s` for a log line, noting how much was dropped.
pub fn clip(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let head = truncate_str(s, max_bytes);
    if head.len() == s.len() {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("{}... [{} more bytes]", head, s.len() - head.len()))
    }
}
