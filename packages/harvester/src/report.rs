//! Report files and console summaries.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ecfr_wordcount::{AgencyTotal, Record};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::{AGENCY_REPORT_STEM, CHAPTER_REPORT_STEM};
use crate::error::Result;

/// Number of agencies listed in the console summary.
pub const SUMMARY_TOP_N: usize = 5;

/// Serialization format of report files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
}

impl ReportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Serialize a report value.
pub fn render_report<T: Serialize + ?Sized>(value: &T, format: ReportFormat) -> Result<String> {
    let mut content = match format {
        ReportFormat::Json => serde_json::to_string_pretty(value)?,
        ReportFormat::Yaml => format!("---\n{}", serde_yaml_ng::to_string(value)?),
    };
    if !content.ends_with('\n') {
        content.push('\n');
    }
    Ok(content)
}

/// Write `value` to `{dir}/{stem}.{ext}`, replacing any previous report.
pub fn write_report<T: Serialize + ?Sized>(
    dir: &Path,
    stem: &str,
    value: &T,
    format: ReportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.{}", format.extension()));
    let content = render_report(value, format)?;

    // Write to temp file first, then sync and rename
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(&path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), "Wrote report");
    Ok(path)
}

/// Per-chapter records as extracted, before merging.
pub fn write_chapter_report(dir: &Path, records: &[Record], format: ReportFormat) -> Result<PathBuf> {
    write_report(dir, CHAPTER_REPORT_STEM, records, format)
}

/// Merged per-agency totals.
pub fn write_agency_report(
    dir: &Path,
    totals: &[AgencyTotal],
    format: ReportFormat,
) -> Result<PathBuf> {
    write_report(dir, AGENCY_REPORT_STEM, totals, format)
}

/// The `n` largest totals, ties broken by agency label.
pub fn top_agencies(totals: &[AgencyTotal], n: usize) -> Vec<&AgencyTotal> {
    let mut ranked: Vec<&AgencyTotal> = totals.iter().collect();
    ranked.sort_by(|a, b| {
        b.word_count
            .cmp(&a.word_count)
            .then_with(|| a.agency.cmp(&b.agency))
    });
    ranked.truncate(n);
    ranked
}

/// Format a count with `,` thousands separators.
///
/// # Examples
/// ```
/// use ecfr_harvester::report::format_thousands;
///
/// assert_eq!(format_thousands(0), "0");
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// ```
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Plain-text summary of merged totals.
pub fn render_summary(totals: &[AgencyTotal]) -> String {
    let total_words: u64 = totals.iter().map(|t| t.word_count).sum();
    let mut lines = vec![
        format!("Agencies: {}", totals.len()),
        format!("Total words: {}", format_thousands(total_words)),
    ];

    let top = top_agencies(totals, SUMMARY_TOP_N);
    if !top.is_empty() {
        lines.push(format!("Top {} agencies:", top.len()));
        for (rank, total) in top.iter().enumerate() {
            let label = if total.agency.is_empty() {
                "(no agency)"
            } else {
                total.agency.as_str()
            };
            lines.push(format!(
                "  {}. {label}: {}",
                rank + 1,
                format_thousands(total.word_count)
            ));
        }
    }

    lines.join("\n")
}
