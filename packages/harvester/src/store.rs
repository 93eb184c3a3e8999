//! On-disk store of downloaded title documents.
//!
//! Documents are saved as `title-{title}[-chapter-{chapter}]-{date}.xml`.
//! Storing is idempotent: a document that is already present is never
//! fetched again, and new files appear atomically via rename so concurrent
//! workers never see a partial document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ecfr_wordcount::TitleId;
use tempfile::NamedTempFile;

use crate::config::sanitize_component;
use crate::error::Result;
use crate::fetch::{DocumentFetcher, DocumentRequest};

/// What `fetch_and_store` did for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The document was already stored; nothing was fetched.
    Cached,
    /// The document was fetched and written.
    Downloaded { bytes: usize },
}

/// A stored document and the title it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub path: PathBuf,
    pub title: TitleId,
}

/// Directory-backed document store.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Use `root` as the store without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` as the store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for a request.
    ///
    /// # Examples
    /// ```
    /// use ecfr_harvester::fetch::DocumentRequest;
    /// use ecfr_harvester::store::DocumentStore;
    ///
    /// let request = DocumentRequest::new(40u32, "2024-01-01").with_chapter("I");
    /// assert_eq!(DocumentStore::file_name(&request), "title-40-chapter-I-2024-01-01.xml");
    /// ```
    #[must_use]
    pub fn file_name(request: &DocumentRequest) -> String {
        let mut name = format!("title-{}", sanitize_component(request.title.as_str()));
        if let Some(chapter) = &request.chapter {
            name.push_str("-chapter-");
            name.push_str(&sanitize_component(chapter));
        }
        name.push('-');
        name.push_str(&sanitize_component(&request.date));
        name.push_str(".xml");
        name
    }

    #[must_use]
    pub fn path_for(&self, request: &DocumentRequest) -> PathBuf {
        self.root.join(Self::file_name(request))
    }

    #[must_use]
    pub fn contains(&self, request: &DocumentRequest) -> bool {
        self.path_for(request).is_file()
    }

    /// Fetch a document unless it is already stored.
    pub fn fetch_and_store(
        &self,
        fetcher: &dyn DocumentFetcher,
        request: &DocumentRequest,
    ) -> Result<StoreOutcome> {
        let path = self.path_for(request);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Document already stored");
            return Ok(StoreOutcome::Cached);
        }

        let bytes = fetcher.fetch(request)?;
        self.write_atomic(&path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Stored document");

        Ok(StoreOutcome::Downloaded { bytes: bytes.len() })
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// All stored title documents, sorted by file name.
    ///
    /// Files whose name carries no title are skipped.
    pub fn list(&self) -> Result<Vec<StoredDocument>> {
        let mut documents = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match title_from_file_name(name) {
                Some(title) => documents.push(StoredDocument { title, path }),
                None => tracing::warn!(file = %name, "Skipping XML file without title in its name"),
            }
        }

        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }
}

/// Title identifier encoded in a stored file name.
///
/// The title is the second `-`-separated field, without extension:
/// `title-12-chapter-II-2024-01-01.xml` gives `12`.
///
/// # Examples
/// ```
/// use ecfr_harvester::store::title_from_file_name;
///
/// assert_eq!(title_from_file_name("title-7-2023-01-01.xml").unwrap().as_str(), "7");
/// assert_eq!(title_from_file_name("title-3.xml").unwrap().as_str(), "3");
/// assert!(title_from_file_name("agencies.xml").is_none());
/// ```
#[must_use]
pub fn title_from_file_name(name: &str) -> Option<TitleId> {
    let field = name.split('-').nth(1)?;
    let title = field.split('.').next().unwrap_or(field);
    if title.is_empty() {
        None
    } else {
        Some(TitleId::from(title))
    }
}
