//! Raw-text utilities for number-field inputs.
//!
//! The remote surface reports the input element's text verbatim. Number
//! inputs are single-line, so line breaks that sneak in through paste or
//! scripted updates are dropped before the text is stored or parsed.

use std::borrow::Cow;

/// Remove CR and LF from raw input text.
///
/// Returns `Cow::Borrowed` when the text has no line breaks.
///
/// # Examples
///
/// ```
/// use input_core::normalize_raw_text;
///
/// assert_eq!(normalize_raw_text("12.5"), "12.5");
/// assert_eq!(normalize_raw_text("12\n.5"), "12.5");
/// assert_eq!(normalize_raw_text("1\r\n2"), "12");
/// ```
pub fn normalize_raw_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['\n', '\r']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Returns `true` if the raw text counts as "nothing entered".
///
/// Only the empty string is blank; whitespace is input the user typed and
/// goes through parsing like any other text.
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.is_empty()
}
