//! Style name tokenization
//!
//! Word style names are arbitrary human-readable strings ("Grid Table 5",
//! "Intense Quote", "Überschrift 1"). HTML classes and Markdown attributes
//! want a restricted alphabet, so names are collapsed to `[A-Za-z0-9_]`
//! tokens before they travel through the converter tree. The token is the
//! key under which the original name is recorded and later restored, so the
//! mapping must be stable across separate program runs.

/// Token used when nothing of a style name survives normalization.
pub const FALLBACK_TOKEN: &str = "Style";

/// Convert a style name into a token safe to round-trip through HTML classes
/// and Markdown attributes.
///
/// Every maximal run of characters outside `[A-Za-z0-9]` collapses to a
/// single underscore; leading and trailing separators are stripped. Never
/// returns an empty string: names with no usable characters map to
/// [`FALLBACK_TOKEN`]. Applying the function to its own output is a no-op.
pub fn style_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !token.is_empty() {
                token.push('_');
            }
            pending_separator = false;
            token.push(ch);
        } else {
            pending_separator = true;
        }
    }
    if token.is_empty() {
        FALLBACK_TOKEN.to_string()
    } else {
        token
    }
}
