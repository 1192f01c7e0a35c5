//! csv-nuds CLI - Convert CSV coin records to NUDS XML
//!
//! # Main Commands
//!
//! ```bash
//! csv-nuds convert out/ zeno.csv defaults.csv   # One NUDS file per row
//! csv-nuds preview zeno.csv defaults.csv --row 3 # Print one converted row
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! csv-nuds parse zeno.csv                        # Just parse CSV to JSON
//! csv-nuds fields                                # Show recognized columns
//! ```

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use csv_nuds::logging::{init_logging, LogConfig, LogFormat};
use csv_nuds::output::render;
use csv_nuds::{
    convert_csv, fields_description, parse_csv_file, preview_csv, ConvertOptions, OutputFormat,
    RecordType,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csv-nuds", version)]
#[command(about = "Convert CSV coin records to NUDS XML", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every row of a CSV file to a NUDS document
    Convert {
        /// Directory receiving one file per row
        output_dir: PathBuf,

        /// Input CSV file
        input: PathBuf,

        /// CSV whose first row supplies values shared by every record
        defaults: Option<PathBuf>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Xml)]
        format: OutputFormat,

        /// Record type of the produced documents
        #[arg(long, value_enum, default_value_t = RecordType::Physical)]
        record_type: RecordType,

        /// Skip rows that fail instead of stopping
        #[arg(short, long)]
        keep_going: bool,

        /// Replace existing files in the output directory
        #[arg(long)]
        overwrite: bool,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Conversion time to record (RFC 3339), for reproducible output
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// Convert a single row and print it
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// CSV whose first row supplies values shared by every record
        defaults: Option<PathBuf>,

        /// Row to convert (1-based, header excluded)
        #[arg(short, long, default_value = "1")]
        row: usize,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Xml)]
        format: OutputFormat,

        /// Record type of the produced document
        #[arg(long, value_enum, default_value_t = RecordType::Physical)]
        record_type: RecordType,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show recognized CSV columns
    Fields,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("⚠️  Logging disabled: {}", e);
    }

    let result = match cli.command {
        Commands::Convert {
            output_dir,
            input,
            defaults,
            delimiter,
            format,
            record_type,
            keep_going,
            overwrite,
            summary,
            timestamp,
        } => {
            let options = ConvertOptions {
                output_dir,
                defaults_path: defaults,
                delimiter,
                record_type,
                format,
                keep_going,
                overwrite,
                timestamp,
            };
            cmd_convert(&input, &options, summary.as_deref())
        }

        Commands::Preview {
            input,
            defaults,
            row,
            delimiter,
            format,
            record_type,
        } => {
            let options = ConvertOptions {
                defaults_path: defaults,
                delimiter,
                record_type,
                format,
                ..Default::default()
            };
            cmd_preview(&input, row, &options)
        }

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::Fields => cmd_fields(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    options: &ConvertOptions,
    summary_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());
    if let Some(ref defaults) = options.defaults_path {
        eprintln!("   Defaults: {}", defaults.display());
    }

    let summary = convert_csv(input, options)?;

    if let Some(ref info) = summary.csv_info {
        eprintln!("   Encoding: {}", info.encoding);
        eprintln!("   Delimiter: '{}'", format_delimiter(info.delimiter));
        eprintln!("   Rows: {}", info.row_count);
        eprintln!("   Columns: {}", info.headers.join(", "));
    }

    eprintln!(
        "\n⚙️  Converted: {} documents into {}",
        summary.written.len(),
        options.output_dir.display()
    );

    if !summary.warned_fields.is_empty() {
        eprintln!("   ⚠️  Ignored columns: {}", summary.warned_fields.join(", "));
    }

    if !summary.skipped.is_empty() {
        eprintln!("   ❌ Skipped: {} rows", summary.skipped.len());
        for skipped in summary.skipped.iter().take(5) {
            eprintln!("     - row {}: {}", skipped.row, skipped.reason);
        }
    }

    if let Some(path) = summary_path {
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        eprintln!("   💾 Summary saved to: {}", path.display());
    }

    if !summary.is_complete() {
        return Err(format!("{} rows could not be converted", summary.skipped.len()).into());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_preview(
    input: &Path,
    row: usize,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Previewing row {} of {}", row, input.display());

    let nuds = preview_csv(input, row, options)?;
    println!("{}", render(&nuds, options.format)?);
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file(input, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_fields() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", fields_description());
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
