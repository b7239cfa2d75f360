use thiserror::Error;

/// Failure to derive one field of an enriched record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("non-numeric coordinate token {token:?}")]
    GeometryParse { token: String },

    #[error("coordinate group has an odd number of tokens ({count})")]
    OddCoordinateCount { count: usize },

    #[error("cannot normalize label {label:?}: {reason}")]
    LabelNormalize { label: String, reason: String },

    #[error("ring {ring} has no coordinates, centroid is undefined")]
    DivisionByZero { ring: usize },

    #[error("issue date {value:?} has no month between 01 and 12 at offset {offset}")]
    MalformedDate { value: String, offset: usize },
}

/// Table-level failure raised while transforming or regrouping
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("table {table}, row {row}, field {field}: {source}")]
    Row {
        table: String,
        row: usize,
        field: &'static str,
        #[source]
        source: RecordError,
    },

    #[error("record count mismatch after regrouping: {expected} rows in, {actual} rows out")]
    RecordCountMismatch { expected: usize, actual: usize },
}

impl ProcessError {
    /// Attach table/row/field context to a record error
    pub fn row(table: &str, row: usize, field: &'static str, source: RecordError) -> Self {
        Self::Row {
            table: table.to_string(),
            row,
            field,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
