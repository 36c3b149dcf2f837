//! String utilities for the domain layer.

/// Keep the first `chars` characters and append `...` when anything was cut.
///
/// The limit counts characters, not bytes, and the ellipsis is not included
/// in it.
pub fn prefix_with_ellipsis(s: &str, chars: usize) -> String {
    match s.char_indices().nth(chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}
