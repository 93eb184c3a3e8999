//! Main harvester service that ties all components together.

use ecfr_wordcount::{aggregate, AgencyTotal, ContainmentRule, ExtractOptions, MergeEngine, Record};

use crate::agencies::document_requests;
use crate::batch::{extract_all, BatchOutcome, DocumentFailure, Progress};
use crate::error::{HarvesterError, Result};
use crate::fetch::{DocumentFetcher, DocumentRequest, EcfrClient};
use crate::store::{DocumentStore, StoredDocument};

/// Everything a processing run produced.
#[derive(Debug, Default)]
pub struct HarvestSummary {
    /// Number of documents attempted.
    pub documents: usize,
    /// Extracted records, before merging.
    pub records: Vec<Record>,
    /// Records left after collapsing contained agencies.
    pub merged: Vec<Record>,
    /// Per-agency totals, sorted by agency.
    pub totals: Vec<AgencyTotal>,
    pub failures: Vec<DocumentFailure>,
}

impl HarvestSummary {
    /// Merge the records of a batch.
    pub fn from_batch(batch: BatchOutcome, engine: MergeEngine) -> Self {
        let merged = engine.merge(&batch.records);
        let totals = aggregate(&merged);

        tracing::info!(
            documents = batch.documents,
            records = batch.records.len(),
            merged = merged.len(),
            agencies = totals.len(),
            failed = batch.failures.len(),
            "Processing finished"
        );

        Self {
            documents: batch.documents,
            records: batch.records,
            merged,
            totals,
            failures: batch.failures,
        }
    }

    /// True when there was work and none of it succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.documents > 0 && self.failures.len() == self.documents
    }
}

/// Document requests for every agency reference at each date.
///
/// The agency directory is fetched once and reused for all dates.
pub fn plan_downloads(client: &EcfrClient, dates: &[String]) -> Result<Vec<DocumentRequest>> {
    let agencies = client.agencies()?;
    tracing::info!(agencies = agencies.len(), "Fetched agency directory");

    let mut requests = Vec::new();
    for date in dates {
        let planned = document_requests(&agencies, date);
        tracing::debug!(date = %date, documents = planned.len(), "Planned downloads");
        requests.extend(planned);
    }
    Ok(requests)
}

/// Extract, merge and total a set of stored documents.
pub fn process_documents(
    documents: &[StoredDocument],
    workers: usize,
    rule: ContainmentRule,
    progress: &dyn Progress,
) -> HarvestSummary {
    let batch = extract_all(documents, workers, &ExtractOptions::default(), progress);
    HarvestSummary::from_batch(batch, MergeEngine::new(rule))
}

/// Process every document in a store.
pub fn process_directory(
    store: &DocumentStore,
    workers: usize,
    rule: ContainmentRule,
) -> Result<HarvestSummary> {
    let documents = store.list()?;
    if documents.is_empty() {
        return Err(HarvesterError::NoDocuments(store.root().to_path_buf()));
    }
    Ok(process_documents(&documents, workers, rule, &()))
}

/// Fetch one document (unless already stored) and process it on its own.
pub fn harvest_title(
    fetcher: &dyn DocumentFetcher,
    store: &DocumentStore,
    request: &DocumentRequest,
    rule: ContainmentRule,
) -> Result<HarvestSummary> {
    store.fetch_and_store(fetcher, request)?;

    let document = StoredDocument {
        path: store.path_for(request),
        title: request.title.clone(),
    };
    let mut summary = process_documents(std::slice::from_ref(&document), 1, rule, &());

    // A single document has nothing to fall back on
    if let Some(failure) = summary.failures.pop() {
        return Err(failure.error);
    }
    Ok(summary)
}
