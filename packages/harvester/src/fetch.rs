//! Document retrieval from the eCFR versioner API.
//!
//! [`DocumentFetcher`] is the seam between the batch layer and the network:
//! the store and worker pool only see raw bytes or a classified failure.

use std::fmt;

use ecfr_wordcount::TitleId;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::agencies::{AgenciesResponse, Agency};
use crate::config::{agencies_url, full_title_url, versions_url, HarvestConfig};
use crate::error::{HarvesterError, Result};
use crate::http::{create_client, download_bytes_with_retry, RetryPolicy};

/// Whether a failed fetch could succeed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The title or version does not exist.
    NotFound,
    /// Network or service trouble; retrying may help.
    Transient,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::Transient => f.write_str("transient failure"),
        }
    }
}

/// A failed document retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {url} ({message})")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind == FetchErrorKind::Transient
    }
}

/// One title document at one version date, optionally limited to a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRequest {
    pub title: TitleId,
    pub chapter: Option<String>,
    pub date: String,
}

impl DocumentRequest {
    pub fn new(title: impl Into<TitleId>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapter: None,
            date: date.into(),
        }
    }

    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }
}

impl fmt::Display for DocumentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "title {}", self.title)?;
        if let Some(chapter) = &self.chapter {
            write!(f, " chapter {chapter}")?;
        }
        write!(f, " @ {}", self.date)
    }
}

/// Source of raw title documents.
pub trait DocumentFetcher: Send + Sync {
    /// Retrieve the raw XML bytes for a request.
    fn fetch(&self, request: &DocumentRequest) -> std::result::Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    date: String,
}

/// Blocking client for the eCFR API.
#[derive(Debug, Clone)]
pub struct EcfrClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl EcfrClient {
    /// Create a client from harvester settings.
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config.http_timeout)?,
            base_url: config.base_url.clone(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let bytes = download_bytes_with_retry(&self.client, url, self.retry)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Download the agency directory.
    pub fn agencies(&self) -> Result<Vec<Agency>> {
        let url = agencies_url(&self.base_url);
        tracing::debug!(url = %url, "Requesting agency directory");
        let response: AgenciesResponse = self.get_json(&url)?;
        Ok(response.agencies)
    }

    /// The most recent version date published by eCFR.
    pub fn latest_date(&self) -> Result<String> {
        let url = versions_url(&self.base_url);
        let response: VersionsResponse = self.get_json(&url)?;
        response
            .versions
            .into_iter()
            .next()
            .map(|v| v.date)
            .ok_or_else(|| HarvesterError::UnexpectedResponse(format!("no versions listed at {url}")))
    }
}

impl DocumentFetcher for EcfrClient {
    fn fetch(&self, request: &DocumentRequest) -> std::result::Result<Vec<u8>, FetchError> {
        let url = full_title_url(
            &self.base_url,
            &request.date,
            request.title.as_str(),
            request.chapter.as_deref(),
        );
        tracing::debug!(url = %url, "Requesting title XML");
        download_bytes_with_retry(&self.client, &url, self.retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_display() {
        let request = DocumentRequest::new(40u32, "2024-01-01");
        assert_eq!(request.to_string(), "title 40 @ 2024-01-01");

        let request = request.with_chapter("I");
        assert_eq!(request.to_string(), "title 40 chapter I @ 2024-01-01");
    }

    #[test]
    fn test_fetch_error_kinds() {
        let transient = FetchError::new(FetchErrorKind::Transient, "u", "503");
        let missing = FetchError::new(FetchErrorKind::NotFound, "u", "404");
        assert!(transient.is_retryable());
        assert!(!missing.is_retryable());
    }

    #[test]
    fn test_client_keeps_base_url() {
        let config = HarvestConfig::default().with_base_url("http://127.0.0.1:1");
        let client = EcfrClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
    }
}
