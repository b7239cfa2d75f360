use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::config::BatchMode;
use crate::warning::types::EnrichedTable;

/// Statistics for one processed yearly table
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    /// Table label, usually the year
    pub label: String,

    /// Number of rows in the table
    pub rows: usize,

    /// Total number of rings across all rows
    pub rings: usize,

    /// Distinct normalized warning types, sorted
    pub warning_types: BTreeSet<String>,
}

impl TableStats {
    /// Collect statistics from an enriched table
    pub fn from_table(table: &EnrichedTable) -> Self {
        Self {
            label: table.label.clone(),
            rows: table.len(),
            rings: table.records.iter().map(|r| r.polygon.rings.len()).sum(),
            warning_types: table.records.iter().map(|r| r.warning_type.clone()).collect(),
        }
    }
}

/// Summary of a complete batch run, written as JSON on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: BatchMode,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// One entry per input table, in processing order
    pub tables: Vec<TableStats>,

    /// Rows per month, January first; only set in monthly mode
    pub monthly_rows: Option<Vec<usize>>,

    /// Every file written, in write order
    pub output_files: Vec<PathBuf>,
}

impl RunSummary {
    /// Start a new summary for the given mode
    pub fn new(mode: BatchMode) -> Self {
        let now = Utc::now();
        Self {
            mode,
            started_at: now,
            finished_at: now,
            tables: Vec::new(),
            monthly_rows: None,
            output_files: Vec::new(),
        }
    }

    /// Record the statistics of a processed table
    pub fn record_table(&mut self, stats: TableStats) {
        self.tables.push(stats);
    }

    /// Record a written output file
    pub fn record_output(&mut self, path: PathBuf) {
        self.output_files.push(path);
    }

    /// Mark the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Total number of input rows across all tables
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Distinct warning types across all tables
    pub fn warning_types(&self) -> BTreeSet<&str> {
        self.tables
            .iter()
            .flat_map(|t| t.warning_types.iter().map(String::as_str))
            .collect()
    }

    /// Wall-clock duration of the run in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
