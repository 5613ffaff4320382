#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address standardization from the command line.
//!
//! ```text
//! addrstd standardize addresses.xlsx [-o out.csv] [--format csv|txt|xlsx]
//! addrstd address "123 nw cor. st." --state ca
//! addrstd serve
//! ```
//!
//! Uses `indicatif-log-bridge` (via [`addrstd_cli_utils::init_logger`])
//! so log lines and the row progress bar share the terminal cleanly.

use std::path::{Path, PathBuf};

use addrstd_address_models::{RowInput, StandardizeOptions};
use addrstd_cli_utils::{IndicatifProgress, MultiProgress};
use addrstd_server_models::ServerConfig;
use addrstd_table::{TableFormat, enrich_table_with_progress, read_table_file, write_table_file};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "addrstd", about = "Standardize postal addresses in CSV and text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a CSV, text, or xlsx file with standardized address columns
    Standardize {
        /// Input file (.csv, .txt, or .xlsx)
        input: PathBuf,
        /// Output file (defaults to `updated_<name>` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (defaults to the output file's extension, else csv).
        /// Standardized rows are filled green in xlsx output
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Skip component parsing and only clean, expand, and title-case
        #[arg(long)]
        no_components: bool,
        /// Base URL for map search links
        #[arg(long)]
        maps_base_url: Option<String>,
    },
    /// Standardize a single address and print the result as JSON
    Address {
        /// Raw address text
        text: String,
        /// Explicit state value
        #[arg(long)]
        state: Option<String>,
        /// Explicit city value
        #[arg(long)]
        city: Option<String>,
        /// Explicit ZIP value
        #[arg(long)]
        zip: Option<String>,
        /// Skip component parsing
        #[arg(long)]
        no_components: bool,
    },
    /// Start the upload/download HTTP server
    Serve,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Txt,
    Xlsx,
}

impl From<OutputFormat> for TableFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Txt => Self::Text,
            OutputFormat::Xlsx => Self::Xlsx,
        }
    }
}

fn options(no_components: bool, maps_base_url: Option<String>) -> StandardizeOptions {
    let mut options = StandardizeOptions {
        parse_components: !no_components,
        ..StandardizeOptions::default()
    };
    if let Some(url) = maps_base_url {
        options.maps_base_url = url;
    }
    options
}

/// Explicit format, else the output extension, else CSV.
fn output_format(format: Option<OutputFormat>, output: Option<&Path>) -> TableFormat {
    format.map_or_else(
        || match output.map(TableFormat::from_path) {
            Some(Ok(format @ (TableFormat::Text | TableFormat::Xlsx))) => format,
            _ => TableFormat::Csv,
        },
        TableFormat::from,
    )
}

/// `updated_<stem>.<ext>` alongside `input`.
fn default_output_path(input: &Path, format: TableFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("addresses");
    let extension = match format {
        TableFormat::Text => "txt",
        TableFormat::Xlsx => "xlsx",
        TableFormat::Csv | TableFormat::Xls => "csv",
    };
    input.with_file_name(format!("updated_{stem}.{extension}"))
}

fn standardize(
    multi: &MultiProgress,
    input: &Path,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    options: &StandardizeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = read_table_file(input)?;

    let format = output_format(format, output.as_deref());
    let output = output.unwrap_or_else(|| default_output_path(input, format));

    let progress = IndicatifProgress::rows_bar(multi, "Standardizing addresses");
    let summary = enrich_table_with_progress(&mut table, options, progress.as_ref())?;

    write_table_file(&table, &output, format)?;

    log::info!(
        "{} rows, {} standardized, {} parsed into components -> {}",
        summary.rows,
        summary.updated,
        summary.structured,
        output.display()
    );
    println!("{}", output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let multi = addrstd_cli_utils::init_logger();

    match cli.command {
        Commands::Standardize {
            input,
            output,
            format,
            no_components,
            maps_base_url,
        } => standardize(
            &multi,
            &input,
            output,
            format,
            &options(no_components, maps_base_url),
        )?,
        Commands::Address {
            text,
            state,
            city,
            zip,
            no_components,
        } => {
            let input = RowInput {
                address: Some(text.as_str()),
                state: state.as_deref(),
                city: city.as_deref(),
                zip: zip.as_deref(),
            };
            let result = addrstd_address::process_row(&input, &options(no_components, None));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Serve => {
            let config = ServerConfig::from_env();
            actix_web::rt::System::new().block_on(addrstd_server::run_server(config))?;
        }
    }

    Ok(())
}
