//! The eCFR agency directory and the documents it points at.
//!
//! Agencies form a tree (departments with sub-agencies). Each agency lists
//! the title/chapter pairs it regulates; those references decide which
//! documents a full download fetches.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::fetch::DocumentRequest;

/// Body of `agencies.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgenciesResponse {
    #[serde(default)]
    pub agencies: Vec<Agency>,
}

/// One agency and its sub-agencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,

    #[serde(default)]
    pub short_name: Option<String>,

    pub slug: String,

    #[serde(default)]
    pub children: Vec<Agency>,

    #[serde(default)]
    pub cfr_references: Vec<CfrReference>,
}

/// A title, optionally narrowed to a chapter, regulated by an agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfrReference {
    pub title: u32,

    #[serde(default)]
    pub chapter: Option<String>,
}

/// Flatten the agency tree depth-first, each parent before its children.
pub fn flatten_agencies(agencies: &[Agency]) -> Vec<&Agency> {
    let mut flat = Vec::new();
    for agency in agencies {
        flat.push(agency);
        flat.extend(flatten_agencies(&agency.children));
    }
    flat
}

/// Document requests for every reference in the directory at one date.
///
/// Duplicates (the same title and chapter cited by several agencies) are
/// dropped, keeping first-seen order.
pub fn document_requests(agencies: &[Agency], date: &str) -> Vec<DocumentRequest> {
    let mut seen = HashSet::new();
    let mut requests = Vec::new();

    for agency in flatten_agencies(agencies) {
        for reference in &agency.cfr_references {
            let mut request = DocumentRequest::new(reference.title, date);
            if let Some(chapter) = reference.chapter.as_deref().filter(|c| !c.is_empty()) {
                request = request.with_chapter(chapter);
            }
            if seen.insert(request.clone()) {
                requests.push(request);
            }
        }
    }

    requests
}
