use std::borrow::Cow;

fn is_allowed(c: char) -> bool {
    // JSON whitespace plus everything printable; DEL and C0 controls are dropped
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{7f}')
}

/// Drops raw control characters from an upstream body before it is parsed as JSON.
/// Well-formed JSON never contains them, so valid payloads come back borrowed and untouched.
pub fn strip_control_chars(body: &str) -> Cow<'_, str> {
    if body.chars().all(is_allowed) {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(body.chars().filter(|&c| is_allowed(c)).collect())
    }
}
