use anyhow::{Context, Result};
use log::{debug, info, trace};

use crate::error::{ProcessError, RecordError};
use crate::warning::parser::{GeometryParser, LabelNormalizer};
use crate::warning::types::{
    EnrichedRecord, EnrichedTable, RawRecord, RawTable, TransformOptions, POLYGON_FIELD,
    WARNING_TYPE_FIELD,
};

use super::centroid::CentroidComputer;
use super::progress::ProgressTracker;

/// Applies label normalization, geometry parsing and centroid computation to every row
#[derive(Debug)]
pub struct TableTransformer {
    /// Configuration options for transforming
    options: TransformOptions,

    /// Parser for the POLYGON column
    geometry_parser: GeometryParser,

    /// Normalizer for the WARNINGTYPE column
    label_normalizer: LabelNormalizer,

    centroid_computer: CentroidComputer,

    /// Progress bar for large tables
    progress_tracker: ProgressTracker,

    /// Worker pool for row transforms; `None` runs on the calling thread
    pool: Option<rayon::ThreadPool>,
}

impl TableTransformer {
    /// Create a new table transformer with the given options
    pub fn new(options: TransformOptions) -> Result<Self> {
        let thread_count = options.parallel_threads.unwrap_or_else(|| {
            let available = num_cpus::get();
            let used = std::cmp::max(1, available.saturating_sub(1));
            debug!("Using {} threads for row transforms (available: {})", used, available);
            used
        });

        let pool = if thread_count > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build()
                .context("Failed to build row transform thread pool")?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            geometry_parser: GeometryParser::new(options.strictness),
            label_normalizer: LabelNormalizer::new(options.strictness),
            centroid_computer: CentroidComputer::new(),
            progress_tracker: ProgressTracker::new(options.show_progress),
            options,
            pool,
        })
    }

    /// Create a new table transformer with default options
    pub fn with_defaults() -> Result<Self> {
        Self::new(TransformOptions::default())
    }

    /// Transform every row of the table, preserving row order
    ///
    /// The table is consumed. On failure the error names the lowest failing row.
    pub fn transform(&self, table: RawTable) -> Result<EnrichedTable, ProcessError> {
        let RawTable { label, records } = table;
        info!("Transforming table {} ({} rows)", label, records.len());

        let results: Vec<Result<EnrichedRecord, ProcessError>> = match &self.pool {
            Some(pool) => pool.install(|| {
                self.progress_tracker
                    .track_parallel_progress(&label, records, |row, raw| self.transform_row(&label, row, raw))
            }),
            None => self
                .progress_tracker
                .track_progress(&label, records, |row, raw| self.transform_row(&label, row, raw)),
        };

        let records = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        debug!("Transformed {} rows of table {}", records.len(), label);
        Ok(EnrichedTable::new(label, records))
    }

    /// Transform one record, reporting the failing source field
    pub fn transform_record(&self, raw: RawRecord) -> Result<EnrichedRecord, (&'static str, RecordError)> {
        let warning_type = self
            .label_normalizer
            .normalize(&raw.warning_type)
            .map_err(|e| (WARNING_TYPE_FIELD, e))?;
        let polygon = self
            .geometry_parser
            .parse(&raw.polygon)
            .map_err(|e| (POLYGON_FIELD, e))?;
        let centroids = self
            .centroid_computer
            .centroids(&polygon)
            .map_err(|e| (POLYGON_FIELD, e))?;

        Ok(EnrichedRecord {
            expire_date: raw.expire_date,
            issue_date: raw.issue_date,
            warning_type,
            polygon,
            centroids,
        })
    }

    fn transform_row(&self, table: &str, row: usize, raw: RawRecord) -> Result<EnrichedRecord, ProcessError> {
        trace!("Transforming row {} of table {}", row, table);
        self.transform_record(raw)
            .map_err(|(field, source)| ProcessError::row(table, row, field, source))
    }

    /// Get the options this transformer was built with
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }
}
