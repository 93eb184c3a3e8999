//! Error types for record extraction.
//!
//! Only document-level failures are errors. A subdivision without a heading
//! falls back to a placeholder, and the merge engine has no failure path.

use thiserror::Error;

/// Error raised while turning a document into records.
#[derive(Debug, Error)]
pub enum WordCountError {
    /// The document is not well-formed XML.
    #[error("XML parsing failed for title {title}: {source}")]
    XmlParse {
        title: String,
        #[source]
        source: roxmltree::Error,
    },

    /// The document bytes are not valid UTF-8.
    #[error("Document for title {title} is not valid UTF-8: {source}")]
    Encoding {
        title: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, WordCountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_parse_display_names_title() {
        let source = roxmltree::Document::parse("<open>").unwrap_err();
        let err = WordCountError::XmlParse {
            title: "7".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("XML parsing failed for title 7"));
    }
}
