mod runner;
mod stats;

// Re-export from submodules
pub use runner::BatchRunner;
pub use stats::{RunSummary, TableStats};
