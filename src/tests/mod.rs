#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::fs;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    use crate::config::{BatchConfig, BatchMode, MonthlySource, YearRange};
    use crate::pipeline::{BatchRunner, RunSummary};
    use crate::store::RecordStore;
    use crate::warning::types::Strictness;

    const HEADER: &str = "EXPIREDATE,ISSUEDATE,WARNINGTYPE,POLYGON";

    // Helper function to write a yearly input file
    fn write_year(dir: &Path, year: u16, rows: &[(&str, &str, &str)]) -> Result<PathBuf> {
        let mut content = format!("{HEADER}\n");
        for (issue, label, polygon) in rows {
            content.push_str(&format!("{issue},{issue},{label},\"{polygon}\"\n"));
        }
        let path = dir.join("raw").join(format!("warn-{year}.csv"));
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, content)?;
        Ok(path)
    }

    // Helper function to build a config rooted in a temporary directory
    fn config_for(dir: &TempDir, mode: BatchMode, start: u16, end: u16) -> BatchConfig {
        let root = dir.path().to_string_lossy().to_string();
        BatchConfig {
            mode,
            input_template: format!("{root}/raw/warn-{{year}}.csv"),
            output_template: format!("{root}/out/warn-{{year}}-parsed.csv"),
            monthly_output_template: format!("{root}/out/monthly/warn-{{month}}.csv"),
            years: Some(YearRange::new(start, end)),
            parallel_threads: Some(2),
            show_progress: false,
            ..BatchConfig::default()
        }
    }

    fn sample_years(dir: &Path) -> Result<()> {
        write_year(
            dir,
            2001,
            &[
                ("2001-03-02T10:00:00", "Tornado Warning", "POLYGON ((-90 40 -92 42))"),
                ("2001-07-04T12:00:00", "Severe Thunderstorm Warning", "POLYGON ((-80.1 35.2 -80.3 35.4))"),
                ("2001-03-20T08:00:00", "Flash Flood Warning", "MULTIPOLYGON (((1 1 3 3)), ((5 5 7 7)))"),
            ],
        )?;
        write_year(
            dir,
            2002,
            &[
                ("2002-07-01T00:00:00", "Tornado Warning", "POLYGON ((-100 30 -100 30))"),
                ("2002-12-31T23:00:00", "Special Marine Warning", "POLYGON ((-70 40 -71 41))"),
            ],
        )?;
        Ok(())
    }

    #[test]
    fn test_per_year_run() -> Result<()> {
        let dir = tempdir()?;
        sample_years(dir.path())?;
        let config = config_for(&dir, BatchMode::PerYear, 2001, 2002);

        let summary = BatchRunner::new(config)?.run()?;

        assert_eq!(summary.tables.len(), 2);
        assert_eq!(summary.total_rows(), 5);
        assert_eq!(summary.output_files.len(), 2);
        assert_eq!(summary.monthly_rows, None);

        let written = fs::read_to_string(dir.path().join("out").join("warn-2001-parsed.csv"))?;
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("EXPIREDATE,ISSUEDATE,WARNINGTYPE,POLYGON,MEAN"));
        assert_eq!(
            lines.next(),
            Some("2001-03-02T10:00:00,2001-03-02T10:00:00,tornado-warning,\"[[[-90.0,40.0],[-92.0,42.0]]]\",\"[[-91.0,41.0]]\"")
        );
        assert_eq!(written.lines().count(), 4);

        // Output reads back with the same content the transformer produced
        let table = RecordStore::new().load_enriched(&summary.output_files[0], "2001")?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[2].warning_type, "flash-flood-warning");
        assert_eq!(table.records[2].polygon.rings.len(), 2);
        assert_eq!(table.records[2].centroids.len(), 2);
        Ok(())
    }

    #[test]
    fn test_monthly_run() -> Result<()> {
        let dir = tempdir()?;
        sample_years(dir.path())?;
        let config = config_for(&dir, BatchMode::Monthly, 2001, 2002);

        let summary = BatchRunner::new(config)?.run()?;

        assert_eq!(
            summary.monthly_rows,
            Some(vec![0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 0, 1])
        );
        assert_eq!(summary.output_files.len(), 12);

        let store = RecordStore::new();
        let march = store.load_enriched(dir.path().join("out/monthly/warn-03.csv"), "03")?;
        let issue_dates: Vec<&str> = march.records.iter().map(|r| r.issue_date.as_str()).collect();
        assert_eq!(issue_dates, vec!["2001-03-02T10:00:00", "2001-03-20T08:00:00"]);

        let july = store.load_enriched(dir.path().join("out/monthly/warn-07.csv"), "07")?;
        let labels: Vec<&str> = july.records.iter().map(|r| r.warning_type.as_str()).collect();
        assert_eq!(labels, vec!["severe-thunderstorm-warning", "tornado-warning"]);

        // Months without warnings still get a file with just the header
        let january = fs::read_to_string(dir.path().join("out/monthly/warn-01.csv"))?;
        assert_eq!(january, "EXPIREDATE,ISSUEDATE,WARNINGTYPE,POLYGON,MEAN\n");
        Ok(())
    }

    #[test]
    fn test_monthly_run_from_enriched_outputs() -> Result<()> {
        let dir = tempdir()?;
        sample_years(dir.path())?;

        BatchRunner::new(config_for(&dir, BatchMode::PerYear, 2001, 2002))?.run()?;
        // Raw inputs are no longer needed
        fs::remove_dir_all(dir.path().join("raw"))?;

        let config = BatchConfig {
            monthly_source: MonthlySource::Enriched,
            ..config_for(&dir, BatchMode::Monthly, 2001, 2002)
        };
        let summary = BatchRunner::new(config)?.run()?;

        assert_eq!(summary.monthly_rows.map(|rows| rows.iter().sum::<usize>()), Some(5));
        Ok(())
    }

    #[test]
    fn test_discovered_years_and_summary_file() -> Result<()> {
        let dir = tempdir()?;
        sample_years(dir.path())?;
        let summary_path = dir.path().join("out").join("summary.json");
        let config = BatchConfig {
            years: None,
            summary_path: Some(summary_path.clone()),
            ..config_for(&dir, BatchMode::PerYear, 0, 0)
        };

        let summary = BatchRunner::new(config)?.run()?;

        let labels: Vec<&str> = summary.tables.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2001", "2002"]);

        let saved: RunSummary = serde_json::from_str(&fs::read_to_string(&summary_path)?)?;
        assert_eq!(saved, summary);
        Ok(())
    }

    #[test]
    fn test_bad_geometry_aborts_run() -> Result<()> {
        let dir = tempdir()?;
        write_year(
            dir.path(),
            2003,
            &[
                ("2003-05-01T00:00:00", "Tornado Warning", "POLYGON ((1 2 3 4))"),
                ("2003-05-02T00:00:00", "Tornado Warning", "POLYGON ((1 2 3 4 5))"),
            ],
        )?;
        let config = BatchConfig {
            strictness: Strictness::Strict,
            ..config_for(&dir, BatchMode::PerYear, 2003, 2003)
        };

        let err = BatchRunner::new(config)?.run().unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("table 2003, row 1, field POLYGON"), "{message}");
        assert!(!dir.path().join("out").join("warn-2003-parsed.csv").exists());
        Ok(())
    }

    #[test]
    fn test_bad_issue_date_aborts_monthly_run() -> Result<()> {
        let dir = tempdir()?;
        write_year(
            dir.path(),
            2004,
            &[("05/01/2004", "Tornado Warning", "POLYGON ((1 2 3 4))")],
        )?;

        let err = BatchRunner::new(config_for(&dir, BatchMode::Monthly, 2004, 2004))?
            .run()
            .unwrap_err();

        assert!(format!("{:#}", err).contains("field ISSUEDATE"));
        Ok(())
    }

    #[test]
    fn test_missing_year_file_fails() -> Result<()> {
        let dir = tempdir()?;
        sample_years(dir.path())?;

        let result = BatchRunner::new(config_for(&dir, BatchMode::PerYear, 2001, 2003))?.run();

        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BatchConfig {
            output_template: "out/parsed.csv".to_string(),
            ..BatchConfig::default()
        };
        assert!(BatchRunner::new(config).is_err());
    }
}
