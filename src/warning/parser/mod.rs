mod geometry;
mod label;

// Re-export from submodules
pub use geometry::GeometryParser;
pub use label::LabelNormalizer;
