use serde::{Serialize, Deserialize};

/// Source column names, used in headers and error context
pub const EXPIRE_DATE_FIELD: &str = "EXPIREDATE";
pub const ISSUE_DATE_FIELD: &str = "ISSUEDATE";
pub const WARNING_TYPE_FIELD: &str = "WARNINGTYPE";
pub const POLYGON_FIELD: &str = "POLYGON";
pub const MEAN_FIELD: &str = "MEAN";

/// A longitude/latitude pair, rendered as `[lon, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Longitude in degrees
    pub lon: f64,

    /// Latitude in degrees
    pub lat: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.lon, coordinate.lat]
    }
}

/// One contiguous part of a warning area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    /// Coordinates in source order
    pub coordinates: Vec<Coordinate>,
}

impl Ring {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// The full spatial extent of one warning, possibly multi-part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    /// Rings in the order they appear in the source text
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Total number of coordinates across all rings
    pub fn coordinate_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }
}

/// One input row as read from a yearly warnings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Expiration timestamp, passed through untouched
    #[serde(rename = "EXPIREDATE")]
    pub expire_date: String,

    /// Issue timestamp; the month is read from a fixed offset
    #[serde(rename = "ISSUEDATE")]
    pub issue_date: String,

    /// Free-text warning category, e.g. "Severe Thunderstorm Warning"
    #[serde(rename = "WARNINGTYPE")]
    pub warning_type: String,

    /// Raw geometry text, e.g. "POLYGON ((-80.1 35.2 -80.3 35.4))"
    #[serde(rename = "POLYGON")]
    pub polygon: String,
}

/// A warning row after label normalization, geometry parsing and centroid computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub expire_date: String,
    pub issue_date: String,

    /// Slug form of the warning type
    pub warning_type: String,

    pub polygon: Polygon,

    /// One centroid per ring of `polygon`, same order
    pub centroids: Vec<Coordinate>,
}

/// A named, ordered set of raw rows (one yearly input file)
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Label used in error messages and logs, usually the year
    pub label: String,

    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(label: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A named, ordered set of enriched rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedTable {
    pub label: String,
    pub records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn new(label: impl Into<String>, records: Vec<EnrichedRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How lenient the parsers are with inputs the source data is known to contain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Drop a trailing unpaired coordinate token and keep empty label segments
    #[default]
    Lenient,

    /// Reject both as errors
    Strict,
}

/// Options controlling how a table is transformed
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Parser strictness
    pub strictness: Strictness,

    /// Number of threads for row transforms; `Some(1)` runs sequentially
    pub parallel_threads: Option<usize>,

    /// Whether to draw a progress bar for large tables
    pub show_progress: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            parallel_threads: None,
            show_progress: false,
        }
    }
}
