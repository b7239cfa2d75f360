pub mod types;
pub mod storage;
pub mod paths;

// Re-export main types and functions for easier access
pub use types::{Column, EnrichedRow};
pub use storage::RecordStore;
pub use paths::{PathResolver, MONTH_PLACEHOLDER, YEAR_PLACEHOLDER};
