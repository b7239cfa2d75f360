mod centroid;
mod progress;
mod table_transformer;

// Re-export from submodules
pub use centroid::CentroidComputer;
pub use progress::ProgressTracker;
pub use table_transformer::TableTransformer;
