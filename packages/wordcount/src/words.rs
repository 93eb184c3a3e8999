//! Whitespace token counting.

/// Count whitespace-delimited tokens.
///
/// Any Unicode whitespace separates tokens; leading, trailing and repeated
/// whitespace never produces empty tokens.
///
/// # Examples
/// ```
/// use ecfr_wordcount::words::count_words;
///
/// assert_eq!(count_words("  The  Administrator\nshall publish. "), 4);
/// assert_eq!(count_words(""), 0);
/// ```
#[must_use]
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
