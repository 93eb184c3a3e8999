//! Splitting subdivision headings into chapter and agency labels.
//!
//! eCFR chapter headings read like
//! `CHAPTER I—ENVIRONMENTAL PROTECTION AGENCY`: the text before the first
//! em-dash names the chapter, the rest names the agency. Agency names can
//! contain em-dashes of their own, so only the first one separates the two.

/// The em-dash separating chapter from agency.
pub const EM_DASH: char = '\u{2014}';

/// Heading text used for subdivisions without a heading element.
pub const NO_HEAD: &str = "No HEAD";

/// Chapter and agency labels derived from one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingParts {
    pub chapter: String,
    pub agency: String,
}

/// Split a heading on the first em-dash.
///
/// Both sides are trimmed. Without an em-dash the whole trimmed heading is
/// the chapter and the agency is empty.
///
/// # Examples
/// ```
/// use ecfr_wordcount::heading::split_heading;
///
/// let parts = split_heading("CHAPTER II—OFFICE OF THE FEDERAL REGISTER");
/// assert_eq!(parts.chapter, "CHAPTER II");
/// assert_eq!(parts.agency, "OFFICE OF THE FEDERAL REGISTER");
///
/// let parts = split_heading("  PARTS 400-499 [RESERVED] ");
/// assert_eq!(parts.chapter, "PARTS 400-499 [RESERVED]");
/// assert_eq!(parts.agency, "");
/// ```
#[must_use]
pub fn split_heading(heading: &str) -> HeadingParts {
    match heading.split_once(EM_DASH) {
        Some((chapter, agency)) => HeadingParts {
            chapter: chapter.trim().to_string(),
            agency: agency.trim().to_string(),
        },
        None => HeadingParts {
            chapter: heading.trim().to_string(),
            agency: String::new(),
        },
    }
}
