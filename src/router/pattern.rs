//! Pattern classification: splitting a registration string into literal
//! runs and dynamic segments.
//!
//! A pattern alternates literal byte runs with dynamic segments, each of
//! which occupies a whole `/`-delimited path segment:
//!
//! - `:name` matches one non-empty segment,
//! - `*name` matches the entire remainder of the path,
//! - `#name:regex` matches a regex at the current position.

use super::error::RouterError;

/// Position of the first dynamic marker (`:`, `*` or `#`) in `pattern`.
pub(crate) fn dynamic_index(pattern: &str) -> Option<usize> {
    pattern.bytes().position(|b| matches!(b, b':' | b'*' | b'#'))
}

/// Index of the `/` terminating the dynamic segment at the head of
/// `segment`, or `None` when the segment runs to the end of the pattern.
///
/// Regex segments may contain backslash-escaped slashes; the first
/// unescaped `/` terminates them.
pub(crate) fn segment_end(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    if bytes.first() == Some(&b'#') {
        (1..bytes.len()).find(|&i| bytes[i] == b'/' && bytes[i - 1] != b'\\')
    } else {
        segment.bytes().position(|b| b == b'/')
    }
}

/// Reject patterns the trie cannot accept before any node is touched.
pub(crate) fn validate(pattern: &str) -> Result<(), RouterError> {
    if pattern.is_empty() {
        return Err(RouterError::EmptyPattern);
    }
    if !pattern.starts_with('/') {
        return Err(RouterError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}
