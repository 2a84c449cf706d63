//! Command implementations for the flatrecord CLI
//!
//! This module contains the command execution logic, progress reporting and
//! summary output for the CLI interface.

use crate::cli::args::{Args, Commands, DecodeArgs, EncodeArgs, LengthArgs, SplitArgs};
use crate::config::CodecConfig;
use crate::constants::LOG_TARGET;
use crate::layout::{CompiledLayout, Layout};
use crate::records::{EolStyle, records_from_file};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Decode statistics for the summary line
#[derive(Debug, Clone, Default)]
pub struct DecodeStats {
    pub records: usize,
    pub complete: usize,
    pub skipped_fields: usize,
}

/// Main command runner
///
/// Sets up logging, loads the codec configuration and dispatches to the
/// selected subcommand.
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let config = CodecConfig::load(args.config_file.as_deref())
        .context("Failed to load codec configuration")?;
    debug!("Loaded configuration: {:?}", config);

    let Some(command) = args.command.clone() else {
        return Ok(());
    };

    match command {
        Commands::Decode(decode) => run_decode(&args, &decode, decode.apply(config)).map(|_| ()),
        Commands::Encode(encode) => run_encode(&args, &encode, encode.apply(config)).map(|_| ()),
        Commands::Length(length) => run_length(&length),
        Commands::Split(split) => run_split(&args, &split),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn load_layout(path: &Path) -> Result<CompiledLayout> {
    let layout = Layout::from_file(path)?;
    let compiled = layout
        .compile()
        .with_context(|| format!("Invalid layout {}", path.display()))?;
    info!(
        "Loaded layout {} ({} fields, {} columns)",
        path.display(),
        compiled.schema().len(),
        compiled.line_length()
    );
    Ok(compiled)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn progress_bar(args: &Args, len: usize) -> Result<Option<ProgressBar>> {
    if !args.show_progress() || len < 2 {
        return Ok(None);
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

/// Records of a flat file, without the empty record after a trailing line ending
fn read_records(path: &Path, eol: EolStyle) -> Result<Vec<String>> {
    let mut records = records_from_file(path, eol)?;
    if records.last().is_some_and(|r| r.is_empty()) {
        records.pop();
    }
    Ok(records)
}

/// Decode every record of the input to one JSON line each
fn run_decode(args: &Args, decode: &DecodeArgs, config: CodecConfig) -> Result<DecodeStats> {
    let start_time = Instant::now();
    let layout = load_layout(&decode.layout)?;
    let records = read_records(&decode.input, decode.eol)?;
    info!("Decoding {} records from {}", records.len(), decode.input.display());

    let mut output = open_output(decode.output.as_deref())?;
    let progress = progress_bar(args, records.len())?;
    let mut stats = DecodeStats::default();

    for (index, text) in records.iter().enumerate() {
        let (record, report) = match &decode.delimiter {
            Some(separator) => layout.decode_delimited(text, separator, &config),
            None => layout.decode_fixed(text, &config),
        };

        stats.records += 1;
        if report.is_complete() {
            stats.complete += 1;
        } else {
            let skipped = report.skipped_paths();
            debug!("Record {} skipped fields: {:?}", index + 1, skipped);
            stats.skipped_fields += skipped.len();
        }

        let value = if decode.report {
            json!({ "record": layout.to_json(&record), "report": report })
        } else {
            layout.to_json(&record)
        };
        serde_json::to_writer(&mut output, &value)
            .with_context(|| format!("Failed to write record {}", index + 1))?;
        output.write_all(b"\n")?;

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    output.flush().context("Failed to flush output")?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if !args.quiet {
        print_decode_summary(&stats, start_time);
    }
    Ok(stats)
}

fn print_decode_summary(stats: &DecodeStats, start_time: Instant) {
    let partial = stats.records - stats.complete;
    let status = if partial == 0 {
        "complete".green()
    } else {
        format!("{} partial", partial).as_str().yellow()
    };
    eprintln!(
        "{} {} records ({}, {} fields skipped) in {}",
        "Decoded".bold(),
        stats.records,
        status,
        stats.skipped_fields,
        HumanDuration(start_time.elapsed())
    );
}

/// Encode each non-blank JSON line of the input, returning the record count
fn run_encode(args: &Args, encode: &EncodeArgs, config: CodecConfig) -> Result<usize> {
    let start_time = Instant::now();
    let layout = load_layout(&encode.layout)?;
    let content = std::fs::read_to_string(&encode.input)
        .with_context(|| format!("Failed to read {}", encode.input.display()))?;
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    let mut output = open_output(encode.output.as_deref())?;
    let progress = progress_bar(args, lines.len())?;

    for (index, line) in &lines {
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", index + 1))?;
        let record = layout
            .from_json(&value)
            .with_context(|| format!("Line {} does not match the layout", index + 1))?;
        let text = layout
            .encode(&record, &config)
            .with_context(|| format!("Failed to encode line {}", index + 1))?;

        output.write_all(text.as_bytes())?;
        output.write_all(encode.eol.as_str().as_bytes())?;

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    output.flush().context("Failed to flush output")?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if !args.quiet {
        eprintln!(
            "{} {} records of {} columns in {}",
            "Encoded".bold(),
            lines.len(),
            layout.line_length(),
            HumanDuration(start_time.elapsed())
        );
    }
    Ok(lines.len())
}

fn run_length(length: &LengthArgs) -> Result<()> {
    let layout = load_layout(&length.layout)?;
    println!("{}", layout.line_length());
    Ok(())
}

fn run_split(args: &Args, split: &SplitArgs) -> Result<()> {
    let records = records_from_file(&split.input, split.eol)?;
    if records.len() == 1 && !records[0].is_empty() {
        warn!(
            "{} contains a single record; check the --eol setting",
            split.input.display()
        );
    }

    if !args.quiet {
        println!("{} {}", "Records:".bold(), records.len().to_string().as_str().cyan());
    }
    for (index, record) in records.iter().enumerate() {
        println!("{:>6}  {}", index, record);
    }
    Ok(())
}
