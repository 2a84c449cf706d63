//! Command-line argument definitions for flatrecord
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{CodecConfig, NestedPlacement};
use crate::records::EolStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the flat record tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flatrecord",
    version,
    about = "Decode and encode fixed-width and delimited flat files",
    long_about = "Converts flat text files to JSON lines and back using a JSON layout that \
                  describes each field's column range or ordinal position."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Codec configuration file (JSON)
    ///
    /// If not specified, <config dir>/flatrecord/config.json is used when present.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode a flat file into JSON lines
    Decode(DecodeArgs),
    /// Encode JSON lines into a fixed-width flat file
    Encode(EncodeArgs),
    /// Print the fixed-width line length of a layout
    Length(LengthArgs),
    /// Split a flat file into records and print them
    Split(SplitArgs),
}

/// Arguments for the decode command
#[derive(Debug, Clone, Parser)]
pub struct DecodeArgs {
    /// JSON layout describing the record
    #[arg(short = 'l', long = "layout", value_name = "FILE")]
    pub layout: PathBuf,

    /// Treat records as delimited by SEP instead of fixed-width
    #[arg(short = 'd', long = "delimiter", value_name = "SEP")]
    pub delimiter: Option<String>,

    #[arg(long = "eol", value_enum, default_value = "unix")]
    pub eol: EolStyle,

    /// Parse floats with a comma as decimal separator
    #[arg(long = "decimal-comma")]
    pub decimal_comma: bool,

    /// Embed the per-field decode report in each output line
    #[arg(long = "report")]
    pub report: bool,

    /// Write JSON lines here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Flat file to decode
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

/// Arguments for the encode command
#[derive(Debug, Clone, Parser)]
pub struct EncodeArgs {
    /// JSON layout describing the record
    #[arg(short = 'l', long = "layout", value_name = "FILE")]
    pub layout: PathBuf,

    /// Line ending written after each record
    #[arg(long = "eol", value_enum, default_value = "unix")]
    pub eol: EolStyle,

    /// Format floats with a comma as decimal separator
    #[arg(long = "decimal-comma")]
    pub decimal_comma: bool,

    /// Write nested records inside their own column range instead of at column 0
    #[arg(long = "nested-at-field")]
    pub nested_at_field: bool,

    /// Write the flat file here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON lines file, one object per record
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

/// Arguments for the length command
#[derive(Debug, Clone, Parser)]
pub struct LengthArgs {
    /// JSON layout describing the record
    #[arg(short = 'l', long = "layout", value_name = "FILE")]
    pub layout: PathBuf,
}

/// Arguments for the split command
#[derive(Debug, Clone, Parser)]
pub struct SplitArgs {
    #[arg(long = "eol", value_enum, default_value = "unix")]
    pub eol: EolStyle,

    /// Flat file to split
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

impl Args {
    /// Log level for the configured verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl DecodeArgs {
    /// Apply command-line switches on top of a loaded configuration
    pub fn apply(&self, config: CodecConfig) -> CodecConfig {
        if self.decimal_comma {
            config.with_decimal_comma(true)
        } else {
            config
        }
    }
}

impl EncodeArgs {
    /// Apply command-line switches on top of a loaded configuration
    pub fn apply(&self, config: CodecConfig) -> CodecConfig {
        let config = if self.decimal_comma {
            config.with_decimal_comma(true)
        } else {
            config
        };
        if self.nested_at_field {
            config.with_nested_placement(NestedPlacement::FieldBegin)
        } else {
            config
        }
    }
}
