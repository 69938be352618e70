//! tsonorm CLI - Command-line interface for the midnight normalization pass
//!
//! Commands:
//! - normalize: Run the full sort/dedup/reconcile pass over a batch
//! - validate: Check a batch against the record shape and report problems
//! - stats: Summarize a batch (channels, duplicates, midnight windows)

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tsonorm::dedup::Deduplicator;
use tsonorm::grouping::ChannelGrouper;
use tsonorm::loader::RecordLoader;
use tsonorm::reconcile::window_max_by_target;
use tsonorm::types::MeasurementRecord;
use tsonorm::{normalize_records, window, NormalizeError, NORMALIZER_VERSION};

/// tsonorm - offline midnight normalization for periodic measurement series
#[derive(Parser)]
#[command(name = "tsonorm")]
#[command(version = NORMALIZER_VERSION)]
#[command(about = "Normalize duplicate and midnight-window sensor readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full normalization pass over a batch
    Normalize {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Validate a batch against the record shape
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize channels, duplicates and midnight windows in a batch
    Stats {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of records
    Json,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// JSON array of records
    Json,
    /// Pretty-printed JSON array
    JsonPretty,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TsonormCliError> {
    match cli.command {
        Commands::Normalize {
            input,
            output,
            input_format,
            output_format,
        } => cmd_normalize(&input, &output, input_format, output_format),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Stats {
            input,
            input_format,
            json,
        } => cmd_stats(&input, input_format, json),
    }
}

fn cmd_normalize(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), TsonormCliError> {
    let records = read_records(input, &input_format)?;

    if records.is_empty() {
        return Err(TsonormCliError::NoRecords);
    }

    let normalized = normalize_records(&records);

    let output_data = match output_format {
        OutputFormat::Json => RecordLoader::to_array(&normalized)?,
        OutputFormat::JsonPretty => RecordLoader::to_array_pretty(&normalized)?,
        OutputFormat::Ndjson => RecordLoader::to_ndjson(&normalized)?,
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), TsonormCliError> {
    let records = read_records(input, &input_format)?;

    let mut errors = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if record.numeric_value().is_nan() {
            errors.push(ValidationErrorDetail {
                index,
                record_id: record.id.clone(),
                error: format!("value {:?} is not numeric", record.value),
            });
        }
        if window::parse_datetime(&record.for_datetime).is_none() {
            errors.push(ValidationErrorDetail {
                index,
                record_id: record.id.clone(),
                error: format!(
                    "for_datetime {:?} does not match YYYY-MM-DD HH:MM:SS",
                    record.for_datetime
                ),
            });
        }
    }

    let invalid_records = errors
        .iter()
        .map(|e| e.index)
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let report = ValidationReport {
        total_records: records.len(),
        invalid_records,
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Validated {} records: {} with problems",
            report.total_records, report.invalid_records
        );
        for error in &report.errors {
            println!("  [{}] record {}: {}", error.index, error.record_id, error.error);
        }
    }

    if report.invalid_records > 0 {
        return Err(TsonormCliError::ValidationFailed(report.invalid_records));
    }

    Ok(())
}

fn cmd_stats(input: &Path, input_format: InputFormat, json: bool) -> Result<(), TsonormCliError> {
    let records = read_records(input, &input_format)?;

    let deduplicated = Deduplicator::remove_duplicates(&records);
    let groups = ChannelGrouper::group_by_channel(&deduplicated);
    let window_records = window::midnight_window_records(&deduplicated);
    let maxima = window_max_by_target(&deduplicated);

    let report = StatsReport {
        total_records: records.len(),
        duplicate_records: records.len() - deduplicated.len(),
        channels: groups.len(),
        midnight_window_records: window_records.len(),
        midnight_buckets: maxima
            .iter()
            .map(|((channel, target), &max_value)| BucketSummary {
                channel: channel.to_string(),
                target_midnight: target.to_string(),
                max_value,
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Records:           {}", report.total_records);
        println!("Duplicates:        {}", report.duplicate_records);
        println!("Channels:          {}", report.channels);
        println!("In window:         {}", report.midnight_window_records);
        println!("Midnight buckets:  {}", report.midnight_buckets.len());
        for bucket in &report.midnight_buckets {
            println!(
                "  {} @ {} -> max {}",
                bucket.channel, bucket.target_midnight, bucket.max_value
            );
        }
    }

    Ok(())
}

fn read_records(
    input: &Path,
    input_format: &InputFormat,
) -> Result<Vec<MeasurementRecord>, TsonormCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Reading records from terminal; pipe a batch or pass --input <file>");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let records = match input_format {
        InputFormat::Json => RecordLoader::parse_array(&input_data)?,
        InputFormat::Ndjson => RecordLoader::parse_ndjson(&input_data)?,
    };

    Ok(records)
}

#[derive(Debug)]
enum TsonormCliError {
    Io(io::Error),
    Load(NormalizeError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
}

impl From<io::Error> for TsonormCliError {
    fn from(e: io::Error) -> Self {
        TsonormCliError::Io(e)
    }
}

impl From<NormalizeError> for TsonormCliError {
    fn from(e: NormalizeError) -> Self {
        TsonormCliError::Load(e)
    }
}

impl From<serde_json::Error> for TsonormCliError {
    fn from(e: serde_json::Error) -> Self {
        TsonormCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TsonormCliError> for CliError {
    fn from(e: TsonormCliError) -> Self {
        match e {
            TsonormCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TsonormCliError::Load(e) => CliError {
                code: "LOAD_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the measurement record shape".to_string()),
            },
            TsonormCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TsonormCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure the input batch is not empty".to_string()),
            },
            TsonormCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix the reported records and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    record_id: String,
    error: String,
}

#[derive(serde::Serialize)]
struct StatsReport {
    total_records: usize,
    duplicate_records: usize,
    channels: usize,
    midnight_window_records: usize,
    midnight_buckets: Vec<BucketSummary>,
}

#[derive(serde::Serialize)]
struct BucketSummary {
    channel: String,
    target_midnight: String,
    max_value: f64,
}
