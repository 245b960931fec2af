//! Identifier-safe tokens for platform strings.

/// Lower-case `s` and replace every character that is not an ASCII letter
/// or digit with `_`.
///
/// Each character is replaced one-for-one after lower-casing, so the
/// positions of the surviving characters are unchanged.
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
