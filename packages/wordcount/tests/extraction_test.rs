//! End-to-end tests from title XML to agency totals.
//!
//! Uses a trimmed Title 1 fixture that covers containment inside a chapter,
//! inline markup, a chapter without heading and a reserved chapter.

use std::fs;
use std::path::Path;

use ecfr_wordcount::{
    extract_str, AgencyTotal, ContainmentRule, ExtractOptions, MergeEngine, Record, TitleId,
};
use pretty_assertions::assert_eq;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn title_1_records() -> Vec<Record> {
    let xml = load_fixture("title-1-sample.xml");
    extract_str(&xml, &TitleId::from(1), &ExtractOptions::default()).expect("fixture parses")
}

#[test]
fn test_records_in_document_order() {
    let records = title_1_records();

    assert_eq!(
        records,
        vec![
            Record::new(1u32, "CHAPTER I", "FEDERAL REGISTER", 6),
            Record::new(
                1u32,
                "CHAPTER I",
                "ADMINISTRATIVE COMMITTEE OF THE FEDERAL REGISTER",
                11
            ),
            Record::new(1u32, "CHAPTER II", "OFFICE OF THE FEDERAL REGISTER", 12),
            Record::new(
                1u32,
                "CHAPTER III",
                "ADMINISTRATIVE CONFERENCE OF THE UNITED STATES",
                6
            ),
            Record::new(1u32, "No HEAD", "", 3),
            Record::new(1u32, "CHAPTERS IV-IX [RESERVED]", "", 0),
        ]
    );
}

#[test]
fn test_title_heading_is_not_a_record() {
    let records = title_1_records();
    assert!(records.iter().all(|r| r.chapter != "Title 1"));
}

#[test]
fn test_merged_records() {
    let merged = MergeEngine::default().merge(&title_1_records());

    let summary: Vec<(&str, &str, u64)> = merged
        .iter()
        .map(|r| (r.chapter.as_str(), r.agency.as_str(), r.word_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "CHAPTER I",
                "ADMINISTRATIVE COMMITTEE OF THE FEDERAL REGISTER",
                17
            ),
            ("CHAPTER II", "OFFICE OF THE FEDERAL REGISTER", 12),
            (
                "CHAPTER III",
                "ADMINISTRATIVE CONFERENCE OF THE UNITED STATES",
                6
            ),
            ("No HEAD", "", 3),
            ("CHAPTERS IV-IX [RESERVED]", "", 0),
        ]
    );
}

#[test]
fn test_agency_totals() {
    let totals = MergeEngine::default().totals(&title_1_records());

    assert_eq!(
        totals,
        vec![
            AgencyTotal::new("", 3),
            AgencyTotal::new("ADMINISTRATIVE COMMITTEE OF THE FEDERAL REGISTER", 17),
            AgencyTotal::new("ADMINISTRATIVE CONFERENCE OF THE UNITED STATES", 6),
            AgencyTotal::new("OFFICE OF THE FEDERAL REGISTER", 12),
        ]
    );
}

#[test]
fn test_totals_across_titles() {
    let xml = load_fixture("title-1-sample.xml");
    let options = ExtractOptions::default();
    let mut records = extract_str(&xml, &TitleId::from(1), &options).unwrap();
    records.extend(extract_str(&xml, &TitleId::from(2), &options).unwrap());

    let totals = MergeEngine::new(ContainmentRule::TokenBoundary).totals(&records);
    let office = totals
        .iter()
        .find(|t| t.agency == "OFFICE OF THE FEDERAL REGISTER")
        .expect("office total");
    assert_eq!(office.word_count, 24);

    let words: u64 = totals.iter().map(|t| t.word_count).sum();
    assert_eq!(words, 2 * (6 + 11 + 12 + 6 + 3));
}
