//! Record extraction from title XML.
//!
//! Every subdivision element (`DIV3`, a chapter in eCFR XML) yields exactly
//! one [`Record`], in document order. The chapter and agency come from the
//! subdivision's heading, the word count from its paragraphs.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{Result, WordCountError};
use crate::heading::{split_heading, NO_HEAD};
use crate::types::{Record, TitleId};
use crate::words::count_words;
use crate::xml::{find_descendant, find_descendants, has_tag, visible_text};

/// Element names consulted during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Tag of the subdivision elements that produce records.
    pub subdivision_tag: String,

    /// Tag of the heading element searched for beneath a subdivision.
    pub heading_tag: String,

    /// Tag of the paragraph elements whose words are counted.
    pub paragraph_tag: String,

    /// Heading text assumed when a subdivision has no heading element.
    pub missing_heading: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            subdivision_tag: "DIV3".to_string(),
            heading_tag: "HEAD".to_string(),
            paragraph_tag: "P".to_string(),
            missing_heading: NO_HEAD.to_string(),
        }
    }
}

/// Parse a title document and extract its records.
///
/// # Errors
/// Returns [`WordCountError::XmlParse`] if the document is not well-formed.
///
/// # Examples
/// ```
/// use ecfr_wordcount::extract::{extract_str, ExtractOptions};
/// use ecfr_wordcount::TitleId;
///
/// let xml = "<ECFR><DIV3><HEAD>CHAPTER I\u{2014}BUREAU</HEAD><P>Two words</P></DIV3></ECFR>";
/// let records = extract_str(xml, &TitleId::from(1), &ExtractOptions::default()).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].agency, "BUREAU");
/// assert_eq!(records[0].word_count, 2);
/// ```
pub fn extract_str(xml: &str, title: &TitleId, options: &ExtractOptions) -> Result<Vec<Record>> {
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, parsing).map_err(|source| {
        WordCountError::XmlParse {
            title: title.to_string(),
            source,
        }
    })?;

    Ok(extract_document(&doc, title, options))
}

/// Decode raw document bytes as UTF-8 and extract their records.
///
/// # Errors
/// Returns [`WordCountError::Encoding`] for invalid UTF-8 and
/// [`WordCountError::XmlParse`] for malformed XML.
pub fn extract_bytes(bytes: &[u8], title: &TitleId, options: &ExtractOptions) -> Result<Vec<Record>> {
    let xml = std::str::from_utf8(bytes).map_err(|source| WordCountError::Encoding {
        title: title.to_string(),
        source,
    })?;
    extract_str(xml, title, options)
}

/// Extract records from an already parsed document.
pub fn extract_document(doc: &Document<'_>, title: &TitleId, options: &ExtractOptions) -> Vec<Record> {
    let records: Vec<Record> = doc
        .descendants()
        .filter(|n| has_tag(*n, &options.subdivision_tag))
        .map(|subdivision| extract_subdivision(subdivision, title, options))
        .collect();

    tracing::debug!(
        title = %title,
        records = records.len(),
        "Extracted subdivision records"
    );

    records
}

/// Build the record for a single subdivision element.
pub fn extract_subdivision(node: Node<'_, '_>, title: &TitleId, options: &ExtractOptions) -> Record {
    let heading = match find_descendant(node, &options.heading_tag) {
        Some(head) => visible_text(head),
        None => {
            tracing::trace!(title = %title, "Subdivision without heading");
            options.missing_heading.clone()
        }
    };
    let parts = split_heading(&heading);

    let word_count = find_descendants(node, &options.paragraph_tag)
        .map(|p| count_words(&visible_text(p)))
        .sum();

    Record {
        title: title.clone(),
        chapter: parts.chapter,
        agency: parts.agency,
        word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(xml: &str) -> Vec<Record> {
        extract_str(xml, &TitleId::from(5), &ExtractOptions::default()).unwrap()
    }

    #[test]
    fn test_extract_single_chapter() {
        let xml = r#"<ECFR><DIV1 TYPE="TITLE"><DIV3 TYPE="CHAPTER">
            <HEAD>CHAPTER I—OFFICE OF PERSONNEL MANAGEMENT</HEAD>
            <DIV5><P>This part applies to all agencies.</P><P>See <I>also</I> part 2.</P></DIV5>
        </DIV3></DIV1></ECFR>"#;

        assert_eq!(
            extract(xml),
            vec![Record::new(5u32, "CHAPTER I", "OFFICE OF PERSONNEL MANAGEMENT", 10)]
        );
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let xml = r#"<ECFR>
            <DIV3><HEAD>CHAPTER II—SECOND</HEAD></DIV3>
            <DIV3><HEAD>CHAPTER I—FIRST</HEAD></DIV3>
        </ECFR>"#;

        let agencies: Vec<String> = extract(xml).into_iter().map(|r| r.agency).collect();
        assert_eq!(agencies, vec!["SECOND", "FIRST"]);
    }

    #[test]
    fn test_missing_heading_falls_back_to_placeholder() {
        let xml = "<ECFR><DIV3><P>one two three</P></DIV3></ECFR>";
        let records = extract(xml);
        assert_eq!(records, vec![Record::new(5u32, "No HEAD", "", 3)]);
        assert_eq!(records[0].chapter, NO_HEAD);
    }

    #[test]
    fn test_only_subdivision_elements_produce_records() {
        let xml = "<ECFR><DIV2><HEAD>SUBTITLE A\u{2014}X</HEAD></DIV2>\
            <DIV3><HEAD>CHAPTER I\u{2014}Y</HEAD><P>w</P></DIV3><!-- DIV3 --></ECFR>";
        assert_eq!(extract(xml), vec![Record::new(5u32, "CHAPTER I", "Y", 1)]);
    }

    #[test]
    fn test_nested_heading_is_found() {
        let xml = "<ECFR><DIV3><DIV4><HEAD>SUBCHAPTER A\u{2014}GENERAL</HEAD></DIV4></DIV3></ECFR>";
        let records = extract(xml);
        assert_eq!(records[0].chapter, "SUBCHAPTER A");
        assert_eq!(records[0].agency, "GENERAL");
    }

    #[test]
    fn test_chapter_without_paragraphs_counts_zero() {
        let xml = "<ECFR><DIV3><HEAD>CHAPTER IX [RESERVED]</HEAD></DIV3></ECFR>";
        let records = extract(xml);
        assert_eq!(records, vec![Record::new(5u32, "CHAPTER IX [RESERVED]", "", 0)]);
    }

    #[test]
    fn test_empty_paragraph_counts_zero() {
        let xml = "<ECFR><DIV3><HEAD>CHAPTER I\u{2014}A</HEAD><P/><P>   </P><P>word</P></DIV3></ECFR>";
        assert_eq!(extract(xml)[0].word_count, 1);
    }

    #[test]
    fn test_document_without_subdivisions() {
        let xml = "<ECFR><DIV1><HEAD>TITLE 5</HEAD></DIV1></ECFR>";
        assert!(extract(xml).is_empty());
    }

    #[test]
    fn test_malformed_document_fails() {
        let err = extract_str("<ECFR><DIV3>", &TitleId::from(5), &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, WordCountError::XmlParse { .. }));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let err = extract_bytes(&[0x3c, 0xff, 0xfe], &TitleId::from(5), &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, WordCountError::Encoding { .. }));
    }

    #[test]
    fn test_doctype_is_accepted() {
        let xml = "<?xml version=\"1.0\"?>\n<!DOCTYPE ECFR>\n<ECFR><DIV3><HEAD>X\u{2014}Y</HEAD></DIV3></ECFR>";
        assert_eq!(extract(xml).len(), 1);
    }

    #[test]
    fn test_custom_tags() {
        let options = ExtractOptions {
            subdivision_tag: "chapter".to_string(),
            heading_tag: "title".to_string(),
            paragraph_tag: "para".to_string(),
            missing_heading: "untitled".to_string(),
        };
        let xml = "<doc><chapter><para>a b</para></chapter></doc>";
        let records = extract_str(xml, &TitleId::from("x"), &options).unwrap();
        assert_eq!(records, vec![Record::new("x", "untitled", "", 2)]);
    }
}
