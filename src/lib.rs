pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod regroup;
pub mod store;
pub mod utils;
pub mod warning;

#[cfg(test)]
mod tests;

// Re-export main types and functions for easier access
pub use warning::types::{Coordinate, Ring, Polygon, RawRecord, EnrichedRecord, RawTable, EnrichedTable, Strictness};
pub use warning::parser::{GeometryParser, LabelNormalizer};
pub use warning::processor::{CentroidComputer, TableTransformer};

pub use regroup::{MonthRegrouper, MonthlyBuckets};
pub use store::{Column, PathResolver, RecordStore};
pub use config::{BatchConfig, BatchMode, MonthlySource, YearRange};
pub use pipeline::{BatchRunner, RunSummary};
pub use error::{ProcessError, RecordError};

// Re-export utility functions
pub use utils::file_utils;
