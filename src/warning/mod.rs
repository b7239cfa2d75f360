pub mod types;
pub mod parser;
pub mod processor;

// Re-export the main API for easier access
pub use types::{Coordinate, Ring, Polygon, RawRecord, EnrichedRecord, RawTable, EnrichedTable, Strictness, TransformOptions};
pub use parser::{GeometryParser, LabelNormalizer};
pub use processor::{CentroidComputer, TableTransformer};
