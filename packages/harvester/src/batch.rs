//! Bounded worker pool for per-document work.
//!
//! Documents are independent of each other, so downloads and extraction run
//! on a fixed number of scoped threads pulling from a shared cursor. Results
//! are put back in job order, which keeps every run reproducible regardless
//! of scheduling. A failing document is recorded and skipped; it never stops
//! the batch.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use ecfr_wordcount::{extract_bytes, ExtractOptions, Record};
use indicatif::ProgressBar;

use crate::error::HarvesterError;
use crate::fetch::{DocumentFetcher, DocumentRequest};
use crate::store::{DocumentStore, StoreOutcome, StoredDocument};

/// Receives a notification each time a job finishes.
pub trait Progress: Sync {
    fn advance(&self, label: &str);
}

impl Progress for () {
    fn advance(&self, _label: &str) {}
}

impl Progress for ProgressBar {
    fn advance(&self, label: &str) {
        self.set_message(label.to_string());
        self.inc(1);
    }
}

/// A document that could not be fetched or parsed.
#[derive(Debug)]
pub struct DocumentFailure {
    /// The request or file that failed.
    pub document: String,
    pub error: HarvesterError,
}

/// Records extracted from a set of documents.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of documents attempted.
    pub documents: usize,
    /// Records of all successful documents, in document then extraction order.
    pub records: Vec<Record>,
    pub failures: Vec<DocumentFailure>,
}

/// Result of storing a set of requests.
#[derive(Debug, Default)]
pub struct DownloadOutcome {
    pub downloaded: usize,
    pub cached: usize,
    pub failures: Vec<DocumentFailure>,
}

/// Run `f` over every job on at most `workers` threads.
///
/// Results come back in job order. A panic in `f` is propagated to the caller.
pub fn run_pool<J, R, F>(jobs: &[J], workers: usize, f: F) -> Vec<R>
where
    J: Sync,
    R: Send,
    F: Fn(&J) -> R + Sync,
{
    if jobs.is_empty() {
        return Vec::new();
    }

    let workers = workers.clamp(1, jobs.len());
    let next = AtomicUsize::new(0);
    let mut slots: Vec<Option<R>> = (0..jobs.len()).map(|_| None).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(index) else {
                            break;
                        };
                        done.push((index, f(job)));
                    }
                    done
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (index, result) in done {
                        slots[index] = Some(result);
                    }
                }
                Err(payload) => panic::resume_unwind(payload),
            }
        }
    });

    slots.into_iter().flatten().collect()
}

/// Store every request that is not stored yet.
pub fn download_all(
    store: &DocumentStore,
    fetcher: &dyn DocumentFetcher,
    requests: &[DocumentRequest],
    workers: usize,
    progress: &dyn Progress,
) -> DownloadOutcome {
    let results = run_pool(requests, workers, |request| {
        let result = store.fetch_and_store(fetcher, request);
        progress.advance(&request.to_string());
        result
    });

    let mut outcome = DownloadOutcome::default();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(StoreOutcome::Cached) => outcome.cached += 1,
            Ok(StoreOutcome::Downloaded { .. }) => outcome.downloaded += 1,
            Err(error) => {
                tracing::warn!(document = %request, error = %error, "Download failed");
                outcome.failures.push(DocumentFailure {
                    document: request.to_string(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        downloaded = outcome.downloaded,
        cached = outcome.cached,
        failed = outcome.failures.len(),
        "Download batch finished"
    );
    outcome
}

/// Read and extract every stored document.
pub fn extract_all(
    documents: &[StoredDocument],
    workers: usize,
    options: &ExtractOptions,
    progress: &dyn Progress,
) -> BatchOutcome {
    let results = run_pool(documents, workers, |document| {
        let result = std::fs::read(&document.path)
            .map_err(HarvesterError::from)
            .and_then(|bytes| {
                extract_bytes(&bytes, &document.title, options).map_err(HarvesterError::from)
            });
        progress.advance(&document.path.display().to_string());
        result
    });

    let mut outcome = BatchOutcome {
        documents: documents.len(),
        ..BatchOutcome::default()
    };
    for (document, result) in documents.iter().zip(results) {
        match result {
            Ok(records) => outcome.records.extend(records),
            Err(error) => {
                tracing::warn!(
                    document = %document.path.display(),
                    error = %error,
                    "Extraction failed"
                );
                outcome.failures.push(DocumentFailure {
                    document: document.path.display().to_string(),
                    error,
                });
            }
        }
    }

    outcome
}
