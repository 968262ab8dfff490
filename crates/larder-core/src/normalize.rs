//! Canonical names for component and result comparison.

/// Canonicalize a component or result name.
///
/// Lower-cases, trims, and strips trailing multiplier suffixes made of
/// whitespace, `x` and one or more digits (`"Flour x3"` becomes `"flour"`).
/// Suffixes are stripped repeatedly, so the function is idempotent.
#[must_use]
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut rest = lowered.trim();
    while let Some(stripped) = strip_multiplier(rest) {
        rest = stripped;
    }
    rest.trim().to_string()
}

/// Returns `s` without a trailing `<whitespace>x<digits>` suffix, if it has one.
fn strip_multiplier(s: &str) -> Option<&str> {
    let without_digits = s.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == s.len() {
        return None;
    }
    let without_x = without_digits.strip_suffix('x')?;
    let head = without_x.trim_end();
    if head.len() == without_x.len() {
        return None;
    }
    Some(head)
}
