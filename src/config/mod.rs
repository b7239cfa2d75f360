//! Batch configuration, loaded from TOML or YAML and overridable from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::regroup::DEFAULT_MONTH_OFFSET;
use crate::store::{Column, PathResolver, MONTH_PLACEHOLDER, YEAR_PLACEHOLDER};
use crate::warning::types::{Strictness, TransformOptions};

/// What the batch run produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// One enriched output file per input year
    #[default]
    PerYear,

    /// Twelve output files, one per calendar month, across all years
    Monthly,
}

/// Where monthly mode reads its yearly tables from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MonthlySource {
    /// Transform the raw input files on the fly
    #[default]
    Raw,

    /// Reuse per-year outputs written by an earlier per-year run
    Enriched,
}

/// Inclusive range of years to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: u16,
    pub end: u16,
}

impl YearRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Years in ascending order
    pub fn years(&self) -> Vec<u16> {
        (self.start..=self.end).collect()
    }
}

/// Configuration for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub mode: BatchMode,

    /// Yearly input files, must contain `{year}`
    pub input_template: String,

    /// Per-year output files, must contain `{year}`
    pub output_template: String,

    /// Monthly output files, must contain `{month}`
    pub monthly_output_template: String,

    /// Years to process; discovered from the input directory when absent
    pub years: Option<YearRange>,

    /// Character offset of the two-digit month in `ISSUEDATE`
    pub month_offset: usize,

    pub strictness: Strictness,

    /// Threads for row transforms, defaults to one less than the CPU count
    pub parallel_threads: Option<usize>,

    pub show_progress: bool,

    /// Columns written to every output file, in order
    pub columns: Vec<Column>,

    pub monthly_source: MonthlySource,

    /// Where to write the JSON run summary, if anywhere
    pub summary_path: Option<PathBuf>,

    /// Additional log file, written alongside console output
    pub log_file: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: BatchMode::PerYear,
            input_template: "data/raw/warn-{year}.csv".to_string(),
            output_template: "data/warn-{year}-parsed.csv".to_string(),
            monthly_output_template: "data/monthly/warn-{month}-parsed.csv".to_string(),
            years: Some(YearRange::new(2001, 2016)),
            month_offset: DEFAULT_MONTH_OFFSET,
            strictness: Strictness::Lenient,
            parallel_threads: None,
            show_progress: true,
            columns: Column::ALL.to_vec(),
            monthly_source: MonthlySource::Raw,
            summary_path: None,
            log_file: None,
        }
    }
}

impl BatchConfig {
    /// Load a configuration file; `.yaml`/`.yml` are read as YAML, anything else as TOML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config {}", path.display()))?
        };

        Ok(config)
    }

    /// Check templates, year range and column selection for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_template.contains(YEAR_PLACEHOLDER) {
            bail!("input_template {:?} must contain {}", self.input_template, YEAR_PLACEHOLDER);
        }
        if !self.output_template.contains(YEAR_PLACEHOLDER) {
            bail!("output_template {:?} must contain {}", self.output_template, YEAR_PLACEHOLDER);
        }
        if self.mode == BatchMode::Monthly && !self.monthly_output_template.contains(MONTH_PLACEHOLDER) {
            bail!(
                "monthly_output_template {:?} must contain {}",
                self.monthly_output_template,
                MONTH_PLACEHOLDER
            );
        }
        if let Some(range) = self.years {
            if range.start > range.end {
                bail!("Year range {}..={} is empty", range.start, range.end);
            }
        }
        if self.columns.is_empty() {
            bail!("At least one output column is required");
        }
        if self.parallel_threads == Some(0) {
            bail!("parallel_threads must be at least 1");
        }
        // Enriched outputs are only readable back when every column was written
        if self.mode == BatchMode::Monthly
            && self.monthly_source == MonthlySource::Enriched
            && !Column::ALL.iter().all(|c| self.columns.contains(c))
        {
            bail!("monthly_source = enriched requires all columns in the per-year outputs");
        }
        Ok(())
    }

    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::new(
            self.input_template.clone(),
            self.output_template.clone(),
            self.monthly_output_template.clone(),
        )
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            strictness: self.strictness,
            parallel_threads: self.parallel_threads,
            show_progress: self.show_progress,
        }
    }
}
