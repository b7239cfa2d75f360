use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

use crate::warning::types::{
    EnrichedRecord, EXPIRE_DATE_FIELD, ISSUE_DATE_FIELD, MEAN_FIELD, POLYGON_FIELD,
    WARNING_TYPE_FIELD,
};

/// An output column of an enriched table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Column {
    ExpireDate,
    IssueDate,
    WarningType,
    Polygon,
    Mean,
}

impl Column {
    /// Every column, in the default output order
    pub const ALL: [Column; 5] = [
        Column::ExpireDate,
        Column::IssueDate,
        Column::WarningType,
        Column::Polygon,
        Column::Mean,
    ];

    /// Header name as written to the CSV file
    pub fn header(&self) -> &'static str {
        match self {
            Column::ExpireDate => EXPIRE_DATE_FIELD,
            Column::IssueDate => ISSUE_DATE_FIELD,
            Column::WarningType => WARNING_TYPE_FIELD,
            Column::Polygon => POLYGON_FIELD,
            Column::Mean => MEAN_FIELD,
        }
    }

    /// Render this column of `record` as a CSV field
    ///
    /// Structured columns are written as JSON nested lists so that they can be
    /// read back with a plain JSON parser.
    pub fn render(&self, record: &EnrichedRecord) -> Result<String> {
        Ok(match self {
            Column::ExpireDate => record.expire_date.clone(),
            Column::IssueDate => record.issue_date.clone(),
            Column::WarningType => record.warning_type.clone(),
            Column::Polygon => serde_json::to_string(&record.polygon)
                .context("Failed to serialize POLYGON")?,
            Column::Mean => serde_json::to_string(&record.centroids)
                .context("Failed to serialize MEAN")?,
        })
    }
}

/// Row shape of a previously written enriched table
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichedRow {
    #[serde(rename = "EXPIREDATE")]
    pub expire_date: String,

    #[serde(rename = "ISSUEDATE")]
    pub issue_date: String,

    #[serde(rename = "WARNINGTYPE")]
    pub warning_type: String,

    /// JSON nested list, `[[[lon, lat], ...], ...]`
    #[serde(rename = "POLYGON")]
    pub polygon: String,

    /// JSON list of centroids, `[[lon, lat], ...]`
    #[serde(rename = "MEAN")]
    pub mean: String,
}

impl EnrichedRow {
    /// Decode the structured columns back into an enriched record
    pub fn into_record(self) -> Result<EnrichedRecord> {
        let polygon = serde_json::from_str(&self.polygon)
            .with_context(|| format!("Invalid POLYGON value {:?}", self.polygon))?;
        let centroids = serde_json::from_str(&self.mean)
            .with_context(|| format!("Invalid MEAN value {:?}", self.mean))?;

        Ok(EnrichedRecord {
            expire_date: self.expire_date,
            issue_date: self.issue_date,
            warning_type: self.warning_type,
            polygon,
            centroids,
        })
    }
}
