use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::{
    api::{OUTPUT_FILENAME, PREVIEW_ROW_LIMIT},
    schema::{DuplicateMode, TransformOptions, parse_options},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Screen tank sales spreadsheets against finance rules",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report that the tool is ready
    Health,
    /// Apply the finance rules and show the leading rows with statistics
    Preview(PreviewArgs),
    /// Apply the finance rules and write the result workbook
    Transform(TransformArgs),
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Transform options as a JSON payload
    #[arg(long, conflicts_with = "config_file")]
    pub config: Option<String>,
    /// YAML or JSON file holding the transform options
    #[arg(long = "config-file")]
    pub config_file: Option<PathBuf>,
    /// Override how rows sharing a tank number are handled
    #[arg(long = "duplicate-mode", value_enum)]
    pub duplicate_mode: Option<DuplicateMode>,
}

impl OptionsArgs {
    pub fn resolve(&self) -> Result<TransformOptions> {
        let mut options = match &self.config_file {
            Some(path) => TransformOptions::load(path)?,
            None => parse_options(self.config.as_deref()).context("Parsing --config")?,
        };
        if let Some(mode) = self.duplicate_mode {
            options.duplicate_mode = mode;
        }
        Ok(options)
    }
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input .xls or .xlsx workbook
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    #[command(flatten)]
    pub options: OptionsArgs,
    /// Number of transformed rows to include
    #[arg(long, default_value_t = PREVIEW_ROW_LIMIT)]
    pub rows: usize,
    /// Render an aligned text table instead of JSON
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Input .xls or .xlsx workbook
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output workbook path
    #[arg(short = 'o', long = "output", default_value = OUTPUT_FILENAME)]
    pub output: PathBuf,
    #[command(flatten)]
    pub options: OptionsArgs,
}
