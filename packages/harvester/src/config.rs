//! Configuration constants, validation and runtime settings for the harvester.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// Base URL of the eCFR public API.
pub const ECFR_BASE_URL: &str = "https://www.ecfr.gov";

/// HTTP timeout in seconds.
///
/// Full title XML can exceed 100 MB for the largest titles.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Default number of documents fetched or parsed concurrently.
pub const DEFAULT_WORKERS: usize = 4;

/// Default directory for downloaded documents and reports.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File stem of the per-chapter record report.
pub const CHAPTER_REPORT_STEM: &str = "output_chapter";

/// File stem of the per-agency totals report.
pub const AGENCY_REPORT_STEM: &str = "output_agency_words";

/// Highest CFR title number.
pub const MAX_TITLE: u32 = 50;

/// Title pattern: one or two digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}$").expect("valid regex"));

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate a CFR title number.
///
/// # Returns
/// * `Ok(number)` for titles 1 through 50
/// * `Err(HarvesterError::InvalidTitle)` otherwise
///
/// # Examples
/// ```
/// use ecfr_harvester::config::validate_title;
///
/// assert_eq!(validate_title("40").unwrap(), 40);
/// assert!(validate_title("51").is_err());
/// assert!(validate_title("X").is_err());
/// ```
pub fn validate_title(title: &str) -> Result<u32> {
    if !TITLE_PATTERN.is_match(title) {
        return Err(HarvesterError::InvalidTitle(title.to_string()));
    }
    match title.parse::<u32>() {
        Ok(n) if (1..=MAX_TITLE).contains(&n) => Ok(n),
        _ => Err(HarvesterError::InvalidTitle(title.to_string())),
    }
}

/// Validate date format (YYYY-MM-DD).
///
/// Rejects dates in the future since eCFR has no versions for them.
///
/// # Examples
/// ```
/// use ecfr_harvester::config::validate_date;
///
/// assert!(validate_date("2024-01-01").is_ok());
/// assert!(validate_date("invalid").is_err());
/// assert!(validate_date("2024-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    let parsed_date = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    let today = chrono::Local::now().date_naive();
    if parsed_date > today {
        return Err(HarvesterError::InvalidDate(format!(
            "{date_str} is in the future (today is {today})"
        )));
    }

    Ok(())
}

/// The version date used for a whole year: January 1st.
///
/// # Examples
/// ```
/// use ecfr_harvester::config::year_date;
///
/// assert_eq!(year_date(2017), "2017-01-01");
/// ```
pub fn year_date(year: i32) -> String {
    format!("{year:04}-01-01")
}

/// Strip everything but alphanumerics, `-`, `_` and `.` from a value used
/// in URLs or file names.
///
/// # Examples
/// ```
/// use ecfr_harvester::config::sanitize_component;
///
/// assert_eq!(sanitize_component("IV"), "IV");
/// assert_eq!(sanitize_component("I&x=1"), "Ix1");
/// ```
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Build the full-title XML URL for a version date, optionally limited to one chapter.
pub fn full_title_url(base_url: &str, date: &str, title: &str, chapter: Option<&str>) -> String {
    let mut url = format!(
        "{}/api/versioner/v1/full/{date}/title-{title}.xml",
        trim_base(base_url)
    );
    if let Some(chapter) = chapter {
        url.push_str("?chapter=");
        url.push_str(&sanitize_component(chapter));
    }
    url
}

/// Build the agency directory URL.
pub fn agencies_url(base_url: &str) -> String {
    format!("{}/api/admin/v1/agencies.json", trim_base(base_url))
}

/// Build the URL listing available version dates.
pub fn versions_url(base_url: &str) -> String {
    format!("{}/api/versioner/v1/versions.json", trim_base(base_url))
}

/// Runtime settings shared by the CLI and library entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub base_url: String,
    pub data_dir: PathBuf,
    pub workers: usize,
    pub http_timeout: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: ECFR_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            workers: DEFAULT_WORKERS,
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

impl HarvestConfig {
    /// Read settings from `ECFR_BASE_URL`, `ECFR_DATA_DIR`, `ECFR_WORKERS`
    /// and `ECFR_HTTP_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("ECFR_BASE_URL").unwrap_or(defaults.base_url);

        let data_dir = std::env::var("ECFR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let workers = std::env::var("ECFR_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.workers);

        let http_timeout = std::env::var("ECFR_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Self {
            base_url,
            data_dir,
            workers: workers.max(1),
            http_timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}
