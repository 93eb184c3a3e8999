//! eCFR Harvester - Download federal regulations and count words per agency.
//!
//! This crate downloads title documents from the electronic Code of Federal
//! Regulations (eCFR), counts the words in every chapter with
//! [`ecfr_wordcount`], merges agencies whose names contain each other and
//! writes per-chapter and per-agency reports.
//!
//! # Example
//!
//! ```
//! use ecfr_harvester::config;
//!
//! // Validate title and date
//! assert!(config::validate_title("40").is_ok());
//! assert!(config::validate_date("2024-01-01").is_ok());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, validation and runtime settings
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retries
//! - [`fetch`]: Document requests and the eCFR API client
//! - [`agencies`]: Agency directory and the documents it references
//! - [`store`]: On-disk document store
//! - [`batch`]: Bounded worker pool for downloads and extraction
//! - [`report`]: Report files and console summaries
//! - [`harvester`]: Main harvester service
//! - [`cli`]: Command-line interface

pub mod agencies;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod harvester;
pub mod http;
pub mod report;
pub mod store;

// Re-export main functions
pub use harvester::{harvest_title, process_directory, HarvestSummary};

// Re-export commonly used items
pub use config::{validate_date, validate_title, HarvestConfig};
pub use error::{HarvesterError, Result};
pub use fetch::{DocumentFetcher, DocumentRequest, EcfrClient, FetchError, FetchErrorKind};
pub use report::ReportFormat;
pub use store::DocumentStore;
