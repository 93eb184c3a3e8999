//! Core data types: records extracted from titles and the totals derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a source document (one eCFR title).
///
/// Supplied by the caller rather than parsed from document content.
/// Numeric titles are kept as their decimal text so that `TitleId::from(7)`
/// and `TitleId::from("7")` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    /// Create a title identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TitleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TitleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for TitleId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// One subdivision of a title: its chapter, governing agency and word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Title the subdivision was extracted from.
    pub title: TitleId,

    /// Heading text before the first em-dash.
    pub chapter: String,

    /// Heading text after the first em-dash, empty when the heading has none.
    pub agency: String,

    /// Whitespace-delimited tokens across all paragraphs of the subdivision.
    pub word_count: u64,
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub fn new(
        title: impl Into<TitleId>,
        chapter: impl Into<String>,
        agency: impl Into<String>,
        word_count: u64,
    ) -> Self {
        Self {
            title: title.into(),
            chapter: chapter.into(),
            agency: agency.into(),
            word_count,
        }
    }

    /// The (title, chapter) key of the partition this record belongs to.
    #[must_use]
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            title: self.title.clone(),
            chapter: self.chapter.clone(),
        }
    }
}

/// Composite key identifying a partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub title: TitleId,
    pub chapter: String,
}

/// Records sharing one (title, chapter), in extraction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: PartitionKey,
    pub records: Vec<Record>,
}

/// Final per-agency word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyTotal {
    pub agency: String,
    pub word_count: u64,
}

impl AgencyTotal {
    #[must_use]
    pub fn new(agency: impl Into<String>, word_count: u64) -> Self {
        Self {
            agency: agency.into(),
            word_count,
        }
    }
}
