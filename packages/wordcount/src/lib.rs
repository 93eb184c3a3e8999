//! eCFR word counts - per-agency word totals from Code of Federal Regulations titles.
//!
//! This crate turns title XML into subdivision records and folds those
//! records into one word count per agency. It performs no I/O; retrieving
//! and storing documents is the job of `ecfr-harvester`.
//!
//! # Example
//!
//! ```
//! use ecfr_wordcount::{agency_totals, extract_str, AgencyTotal, ExtractOptions, TitleId};
//!
//! let xml = "<ECFR>\
//!     <DIV3><HEAD>CHAPTER I\u{2014}Bureau</HEAD><P>one two</P></DIV3>\
//!     <DIV3><HEAD>CHAPTER I\u{2014}Bureau of Examples</HEAD><P>three</P></DIV3>\
//! </ECFR>";
//! let records = extract_str(xml, &TitleId::from(1), &ExtractOptions::default()).unwrap();
//! assert_eq!(agency_totals(&records), vec![AgencyTotal::new("Bureau of Examples", 3)]);
//! ```
//!
//! # Architecture
//!
//! - [`types`]: records, partitions and agency totals
//! - [`heading`]: chapter/agency split on the em-dash
//! - [`words`]: whitespace token counting
//! - [`xml`]: document navigation helpers
//! - [`extract`]: subdivision records from title XML
//! - [`containment`]: the merge trigger predicate
//! - [`merge`]: partitioning, containment collapse and aggregation
//! - [`error`]: error types and Result alias

pub mod containment;
pub mod error;
pub mod extract;
pub mod heading;
pub mod merge;
pub mod types;
pub mod words;
pub mod xml;

pub use containment::ContainmentRule;
pub use error::{Result, WordCountError};
pub use extract::{extract_bytes, extract_document, extract_str, ExtractOptions};
pub use heading::{split_heading, HeadingParts, NO_HEAD};
pub use merge::{agency_totals, aggregate, collapse, partition, MergeEngine};
pub use types::{AgencyTotal, Partition, PartitionKey, Record, TitleId};
