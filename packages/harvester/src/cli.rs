//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use ecfr_wordcount::ContainmentRule;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::download_all;
use crate::config::{validate_date, validate_title, year_date, HarvestConfig};
use crate::error::{HarvesterError, Result};
use crate::fetch::{DocumentRequest, EcfrClient};
use crate::harvester::{harvest_title, plan_downloads, process_documents, HarvestSummary};
use crate::report::{render_summary, write_agency_report, write_chapter_report, ReportFormat};
use crate::store::DocumentStore;

/// eCFR Harvester - Download federal regulations and count words per agency.
#[derive(Parser)]
#[command(name = "ecfr-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every title document referenced by the agency directory.
    Download {
        /// Version date in YYYY-MM-DD format
        #[arg(short, long, conflicts_with_all = ["latest", "year"])]
        date: Option<String>,

        /// Use the most recent version date (default)
        #[arg(long, conflicts_with = "year")]
        latest: bool,

        /// Download the January 1st version of a year (repeatable)
        #[arg(short, long)]
        year: Vec<i32>,

        /// Directory to store documents in (default: $ECFR_DATA_DIR or data/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of concurrent downloads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Count words in stored documents and write the reports.
    Process {
        /// Directory holding downloaded documents (default: $ECFR_DATA_DIR or data/)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the reports (default: the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// How agency names contain each other: substring or token
        #[arg(short, long, default_value = "substring")]
        rule: ContainmentRule,

        /// Number of documents parsed concurrently
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Download and process a single title.
    Title {
        /// CFR title number (1-50)
        title: String,

        /// Limit to one chapter (e.g., IV)
        #[arg(short, long)]
        chapter: Option<String>,

        /// Version date in YYYY-MM-DD format (default: latest)
        #[arg(short, long)]
        date: Option<String>,

        /// Directory for the document and reports (default: $ECFR_DATA_DIR or data/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// How agency names contain each other: substring or token
        #[arg(short, long, default_value = "substring")]
        rule: ContainmentRule,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = HarvestConfig::from_env();

    match cli.command {
        Commands::Download {
            date,
            latest,
            year,
            output,
            workers,
        } => {
            let selection = select_dates(date, latest, &year)?;
            download_command(apply_overrides(config, output, workers), selection)
        }
        Commands::Process {
            input,
            output,
            format,
            rule,
            workers,
        } => {
            let config = apply_overrides(config, input, workers);
            let output = output.unwrap_or_else(|| config.data_dir.clone());
            process_command(&config, &output, format, rule)
        }
        Commands::Title {
            title,
            chapter,
            date,
            output,
            format,
            rule,
        } => title_command(
            apply_overrides(config, output, None),
            &title,
            chapter,
            date,
            format,
            rule,
        ),
    }
}

fn apply_overrides(
    mut config: HarvestConfig,
    data_dir: Option<PathBuf>,
    workers: Option<usize>,
) -> HarvestConfig {
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    config
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .expect("valid template"),
    );
    pb
}

/// Which version dates a download covers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DateSelection {
    /// Ask the API for the most recent version date.
    Latest,
    Dates(Vec<String>),
}

/// Turn the download flags into validated dates.
///
/// `--latest` is the default when neither `--date` nor `--year` is given.
fn select_dates(date: Option<String>, latest: bool, years: &[i32]) -> Result<DateSelection> {
    let dates = match date {
        Some(date) => vec![date],
        None if latest || years.is_empty() => return Ok(DateSelection::Latest),
        None => years.iter().map(|&y| year_date(y)).collect(),
    };
    for date in &dates {
        validate_date(date)?;
    }
    Ok(DateSelection::Dates(dates))
}

fn resolve_dates(client: &EcfrClient, selection: DateSelection) -> Result<Vec<String>> {
    match selection {
        DateSelection::Latest => Ok(vec![client.latest_date()?]),
        DateSelection::Dates(dates) => Ok(dates),
    }
}

/// Execute the download command.
fn download_command(config: HarvestConfig, selection: DateSelection) -> Result<()> {
    let store = DocumentStore::open(&config.data_dir)?;
    let client = EcfrClient::new(&config)?;

    let pb = spinner("Fetching agency directory...");
    let planned = resolve_dates(&client, selection)
        .and_then(|dates| plan_downloads(&client, &dates).map(|requests| (dates, requests)));
    pb.finish_and_clear();
    let (dates, requests) = planned?;

    println!(
        "{} {} documents for {}",
        style("Downloading").bold(),
        style(requests.len()).cyan(),
        style(dates.join(", ")).green()
    );

    let pb = progress_bar(requests.len());
    let outcome = download_all(&store, &client, &requests, config.workers, &pb);
    pb.finish_and_clear();

    println!("  Downloaded: {}", style(outcome.downloaded).green());
    println!("  Already stored: {}", outcome.cached);
    print_failures(&outcome.failures);

    if !requests.is_empty() && outcome.failures.len() == requests.len() {
        return Err(HarvesterError::AllFailed(requests.len()));
    }

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        store.root().display()
    );
    Ok(())
}

/// Execute the process command.
fn process_command(
    config: &HarvestConfig,
    output: &Path,
    format: ReportFormat,
    rule: ContainmentRule,
) -> Result<()> {
    let store = DocumentStore::new(&config.data_dir);
    let documents = store.list()?;
    if documents.is_empty() {
        return Err(HarvesterError::NoDocuments(store.root().to_path_buf()));
    }

    println!(
        "{} {} documents ({} containment)",
        style("Processing").bold(),
        style(documents.len()).cyan(),
        rule
    );

    let pb = progress_bar(documents.len());
    let summary = process_documents(&documents, config.workers, rule, &pb);
    pb.finish_and_clear();

    print_failures(&summary.failures);
    if summary.all_failed() {
        return Err(HarvesterError::AllFailed(summary.documents));
    }

    write_reports(&summary, output, format)
}

/// Execute the title command.
fn title_command(
    config: HarvestConfig,
    title: &str,
    chapter: Option<String>,
    date: Option<String>,
    format: ReportFormat,
    rule: ContainmentRule,
) -> Result<()> {
    // Validate inputs before making HTTP requests
    let number = validate_title(title)?;
    if let Some(date) = &date {
        validate_date(date)?;
    }

    let store = DocumentStore::open(&config.data_dir)?;
    let client = EcfrClient::new(&config)?;

    let pb = spinner("Resolving version date...");
    let date = match date {
        Some(date) => date,
        None => match client.latest_date() {
            Ok(date) => date,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        },
    };

    let mut request = DocumentRequest::new(number, date);
    if let Some(chapter) = chapter {
        request = request.with_chapter(chapter);
    }

    pb.set_message(format!("Downloading {request}..."));
    let summary = match harvest_title(&client, &store, &request, rule) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    println!("{} {}", style("Processed").bold(), style(&request).cyan());
    write_reports(&summary, &config.data_dir, format)
}

fn write_reports(summary: &HarvestSummary, output: &Path, format: ReportFormat) -> Result<()> {
    let chapter_path = write_chapter_report(output, &summary.records, format)?;
    let agency_path = write_agency_report(output, &summary.totals, format)?;

    println!();
    println!("{}", render_summary(&summary.totals));
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        chapter_path.display()
    );
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        agency_path.display()
    );
    Ok(())
}

fn print_failures(failures: &[crate::batch::DocumentFailure]) {
    if failures.is_empty() {
        return;
    }
    println!("  Failed: {}", style(failures.len()).yellow().bold());
    for failure in failures {
        println!("    {}: {}", failure.document, style(&failure.error).dim());
    }
}
