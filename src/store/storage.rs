use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use super::types::{Column, EnrichedRow};
use crate::utils::file_utils;
use crate::warning::types::{EnrichedRecord, EnrichedTable, RawRecord, RawTable};

/// CSV-backed storage for warning tables
#[derive(Debug, Default, Clone)]
pub struct RecordStore {}

impl RecordStore {
    /// Create a new record store
    pub fn new() -> Self {
        Self {}
    }

    /// Load a raw yearly table; columns other than the four source fields are ignored
    pub fn load_raw(&self, path: impl AsRef<Path>, label: &str) -> Result<RawTable> {
        let path = path.as_ref();
        debug!("Loading raw table from {}", path.display());

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open table {}", path.display()))?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<RawRecord>().enumerate() {
            let record = result
                .with_context(|| format!("Failed to read row {} of {}", row, path.display()))?;
            records.push(record);
        }

        info!("Loaded {} rows from {}", records.len(), path.display());
        Ok(RawTable::new(label, records))
    }

    /// Load a table previously written with all columns
    pub fn load_enriched(&self, path: impl AsRef<Path>, label: &str) -> Result<EnrichedTable> {
        let path = path.as_ref();
        debug!("Loading enriched table from {}", path.display());

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open table {}", path.display()))?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<EnrichedRow>().enumerate() {
            let record = result
                .map_err(anyhow::Error::from)
                .and_then(EnrichedRow::into_record)
                .with_context(|| format!("Failed to read row {} of {}", row, path.display()))?;
            records.push(record);
        }

        info!("Loaded {} enriched rows from {}", records.len(), path.display());
        Ok(EnrichedTable::new(label, records))
    }

    /// Write records with the selected columns, creating parent directories as needed
    pub fn save(&self, records: &[EnrichedRecord], path: impl AsRef<Path>, columns: &[Column]) -> Result<()> {
        let path = path.as_ref();
        debug!("Saving {} rows to {}", records.len(), path.display());

        if let Some(parent) = path.parent() {
            file_utils::ensure_dir_exists(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create table {}", path.display()))?;

        writer
            .write_record(columns.iter().map(Column::header))
            .with_context(|| format!("Failed to write header to {}", path.display()))?;

        for (row, record) in records.iter().enumerate() {
            let fields = columns
                .iter()
                .map(|column| column.render(record))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Failed to render row {}", row))?;
            writer
                .write_record(&fields)
                .with_context(|| format!("Failed to write row {} to {}", row, path.display()))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;

        info!("Saved {} rows to {}", records.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const RAW_CSV: &str = "\
ISSUEDATE,EXPIREDATE,WFO,WARNINGTYPE,POLYGON
2008-06-14T10:00:00,2008-06-14T11:00:00,RAH,Severe Thunderstorm Warning,\"POLYGON ((-80.1 35.2 -80.3 35.4))\"
2008-07-01T00:00:00,2008-07-01T01:00:00,GSP,Tornado Warning,\"POLYGON ((-81 34 -82 35 -81 36))\"
";

    #[test]
    fn loads_raw_rows_ignoring_extra_columns() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("warn-2008.csv");
        fs::write(&path, RAW_CSV)?;

        let table = RecordStore::new().load_raw(&path, "2008")?;

        assert_eq!(table.label, "2008");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].warning_type, "Severe Thunderstorm Warning");
        assert_eq!(table.records[1].polygon, "POLYGON ((-81 34 -82 35 -81 36))");
        assert_eq!(table.records[1].expire_date, "2008-07-01T01:00:00");
        Ok(())
    }

    #[test]
    fn missing_column_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.csv");
        fs::write(&path, "ISSUEDATE,EXPIREDATE,WARNINGTYPE\n2008-06-14,2008-06-14,Tornado\n")?;

        assert!(RecordStore::new().load_raw(&path, "bad").is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = RecordStore::new()
            .load_raw("/nonexistent/warn-1999.csv", "1999")
            .unwrap_err();
        assert!(err.to_string().contains("warn-1999.csv"));
    }

    #[test]
    fn saves_selected_columns_in_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("out.csv");
        let record = EnrichedRecord {
            expire_date: "e".to_string(),
            issue_date: "2008-06-14".to_string(),
            warning_type: "tornado-warning".to_string(),
            polygon: Default::default(),
            centroids: Vec::new(),
        };

        RecordStore::new().save(&[record], &path, &[Column::WarningType, Column::IssueDate, Column::Mean])?;

        let written = fs::read_to_string(&path)?;
        assert_eq!(written, "WARNINGTYPE,ISSUEDATE,MEAN\ntornado-warning,2008-06-14,[]\n");
        Ok(())
    }
}
