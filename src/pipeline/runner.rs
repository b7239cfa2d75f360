use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::{BatchConfig, BatchMode, MonthlySource};
use crate::regroup::{MonthRegrouper, MonthlyBuckets, MONTHS};
use crate::store::{PathResolver, RecordStore};
use crate::utils::file_utils;
use crate::warning::processor::TableTransformer;
use crate::warning::types::EnrichedTable;

use super::stats::{RunSummary, TableStats};

/// Drives a whole batch: loads each year, enriches it and writes the outputs
#[derive(Debug)]
pub struct BatchRunner {
    /// Validated configuration for this run
    config: BatchConfig,

    /// CSV storage for inputs and outputs
    store: RecordStore,

    /// Year and month path templates
    resolver: PathResolver,

    transformer: TableTransformer,
}

impl BatchRunner {
    /// Create a runner from a configuration, validating it first
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate().context("Invalid batch configuration")?;

        Ok(Self {
            store: RecordStore::new(),
            resolver: config.path_resolver(),
            transformer: TableTransformer::new(config.transform_options())?,
            config,
        })
    }

    /// Run the configured mode to completion
    pub fn run(&self) -> Result<RunSummary> {
        let years = self.years()?;
        info!(
            "Starting {:?} run over {} years ({})",
            self.config.mode,
            years.len(),
            describe_years(&years)
        );

        let mut summary = RunSummary::new(self.config.mode);
        match self.config.mode {
            BatchMode::PerYear => self.run_per_year(&years, &mut summary)?,
            BatchMode::Monthly => self.run_monthly(&years, &mut summary)?,
        }
        summary.finish();

        info!(
            "Run complete: {} tables, {} rows, {} files written in {:.1}s",
            summary.tables.len(),
            summary.total_rows(),
            summary.output_files.len(),
            summary.elapsed_seconds()
        );

        if let Some(path) = &self.config.summary_path {
            let content = serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
            file_utils::write_string_to_file(path, &content)?;
            info!("Wrote run summary to {}", path.display());
        }

        Ok(summary)
    }

    /// Years from the configured range, or discovered from the input directory
    pub fn years(&self) -> Result<Vec<u16>> {
        match self.config.years {
            Some(range) => Ok(range.years()),
            None => self.resolver.discover_years(),
        }
    }

    fn run_per_year(&self, years: &[u16], summary: &mut RunSummary) -> Result<()> {
        for &year in years {
            let table = self.load_transformed(year)?;
            let stats = TableStats::from_table(&table);
            info!(
                "Year {}: {} rows, warning types: {}",
                year,
                stats.rows,
                stats.warning_types.iter().cloned().collect::<Vec<_>>().join(", ")
            );

            let path = self.resolver.output_path(year);
            self.store.save(&table.records, &path, &self.config.columns)?;

            summary.record_table(stats);
            summary.record_output(path);
        }
        Ok(())
    }

    fn run_monthly(&self, years: &[u16], summary: &mut RunSummary) -> Result<()> {
        let regrouper = MonthRegrouper::new(self.config.month_offset);

        // Each year's table is moved into the buckets and dropped before the next load
        let buckets = years
            .iter()
            .try_fold(regrouper.buckets(), |mut buckets: MonthlyBuckets, &year| -> Result<MonthlyBuckets> {
                let table = match self.config.monthly_source {
                    MonthlySource::Raw => self.load_transformed(year)?,
                    MonthlySource::Enriched => self.load_enriched(year)?,
                };
                summary.record_table(TableStats::from_table(&table));
                buckets.append(table)?;
                debug!("Buckets after {}: {:?}", year, buckets.counts());
                Ok(buckets)
            })?;

        let months = buckets.finish()?;
        summary.monthly_rows = Some(months.iter().map(Vec::len).collect());

        for (index, records) in months.iter().enumerate() {
            // `index` is below MONTHS, so it always fits in a u8
            let month = (index + 1) as u8;
            let path = self.resolver.monthly_output_path(month);
            self.store.save(records, &path, &self.config.columns)?;
            summary.record_output(path);
        }

        debug_assert_eq!(summary.output_files.len(), MONTHS);
        Ok(())
    }

    fn load_transformed(&self, year: u16) -> Result<EnrichedTable> {
        let raw = self.store.load_raw(self.resolver.input_path(year), &year.to_string())?;
        let table = self.transformer.transform(raw)?;
        Ok(table)
    }

    fn load_enriched(&self, year: u16) -> Result<EnrichedTable> {
        self.store.load_enriched(self.resolver.output_path(year), &year.to_string())
    }

    /// Get the configuration this runner was built with
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

fn describe_years(years: &[u16]) -> String {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "none".to_string(),
    }
}
