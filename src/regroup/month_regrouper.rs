use log::{debug, info};

use crate::error::{ProcessError, RecordError};
use crate::warning::types::{EnrichedRecord, EnrichedTable, ISSUE_DATE_FIELD};

/// Number of calendar-month buckets
pub const MONTHS: usize = 12;

/// Default character offset of the two-digit month in `ISSUEDATE` (`YYYY-MM-...`)
pub const DEFAULT_MONTH_OFFSET: usize = 5;

/// Twelve month buckets accumulated across yearly tables
///
/// Tables are appended one at a time and dropped once their rows are distributed.
/// `finish` checks that every appended row landed in exactly one bucket.
#[derive(Debug)]
pub struct MonthlyBuckets {
    /// Offset of the month digits within the issue date
    month_offset: usize,

    /// `buckets[m]` holds rows issued in month `m + 1`, in input order
    buckets: [Vec<EnrichedRecord>; MONTHS],

    /// Rows appended so far, counted before distribution
    input_rows: usize,

    /// Labels of the tables appended so far
    tables: Vec<String>,
}

impl MonthlyBuckets {
    /// Create an empty set of buckets reading the month at `month_offset`
    pub fn new(month_offset: usize) -> Self {
        Self {
            month_offset,
            buckets: Default::default(),
            input_rows: 0,
            tables: Vec::new(),
        }
    }

    /// Distribute every row of `table` into its month bucket
    ///
    /// Fails on the first row whose issue date has no valid month. The table is
    /// consumed either way.
    pub fn append(&mut self, table: EnrichedTable) -> Result<(), ProcessError> {
        let EnrichedTable { label, records } = table;
        debug!("Regrouping {} rows of table {}", records.len(), label);
        self.input_rows += records.len();

        for (row, record) in records.into_iter().enumerate() {
            let month = month_of(&record.issue_date, self.month_offset)
                .map_err(|e| ProcessError::row(&label, row, ISSUE_DATE_FIELD, e))?;
            self.buckets[usize::from(month) - 1].push(record);
        }

        self.tables.push(label);
        Ok(())
    }

    /// Number of rows currently held across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows currently held per month, January first
    pub fn counts(&self) -> [usize; MONTHS] {
        let mut counts = [0; MONTHS];
        for (count, bucket) in counts.iter_mut().zip(&self.buckets) {
            *count = bucket.len();
        }
        counts
    }

    /// Verify no row was lost or duplicated and hand out the buckets
    pub fn finish(self) -> Result<[Vec<EnrichedRecord>; MONTHS], ProcessError> {
        let actual = self.len();
        if actual != self.input_rows {
            return Err(ProcessError::RecordCountMismatch {
                expected: self.input_rows,
                actual,
            });
        }

        info!(
            "Regrouped {} rows from {} tables into {} months",
            actual,
            self.tables.len(),
            MONTHS
        );
        Ok(self.buckets)
    }
}

/// Stateless entry point for regrouping a complete sequence of tables
#[derive(Debug, Clone)]
pub struct MonthRegrouper {
    month_offset: usize,
}

impl Default for MonthRegrouper {
    fn default() -> Self {
        Self::new(DEFAULT_MONTH_OFFSET)
    }
}

impl MonthRegrouper {
    pub fn new(month_offset: usize) -> Self {
        Self { month_offset }
    }

    /// Start an incremental regrouping
    pub fn buckets(&self) -> MonthlyBuckets {
        MonthlyBuckets::new(self.month_offset)
    }

    /// Regroup every table, in order, into twelve month buckets
    pub fn regroup<I>(&self, tables: I) -> Result<[Vec<EnrichedRecord>; MONTHS], ProcessError>
    where
        I: IntoIterator<Item = EnrichedTable>,
    {
        tables
            .into_iter()
            .try_fold(self.buckets(), |mut buckets, table| {
                buckets.append(table)?;
                Ok(buckets)
            })?
            .finish()
    }
}

/// Read the 1-based month from the two characters at `offset`
pub fn month_of(issue_date: &str, offset: usize) -> Result<u8, RecordError> {
    let malformed = || RecordError::MalformedDate {
        value: issue_date.to_string(),
        offset,
    };

    let digits = issue_date.get(offset..offset + 2).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let month: u8 = digits.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&month) {
        return Err(malformed());
    }

    Ok(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::types::Polygon;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn record(issue_date: &str, tag: &str) -> EnrichedRecord {
        EnrichedRecord {
            expire_date: tag.to_string(),
            issue_date: issue_date.to_string(),
            warning_type: "tornado-warning".to_string(),
            polygon: Polygon::default(),
            centroids: Vec::new(),
        }
    }

    fn tags(bucket: &[EnrichedRecord]) -> Vec<&str> {
        bucket.iter().map(|r| r.expire_date.as_str()).collect()
    }

    #[test_case("2008-06-14T10:00:00", 6)]
    #[test_case("2001-01-01 00:00", 1)]
    #[test_case("2016-12-31", 12)]
    fn reads_month(issue_date: &str, expected: u8) {
        assert_eq!(month_of(issue_date, DEFAULT_MONTH_OFFSET).unwrap(), expected);
    }

    #[test_case("2008-00-14" ; "month zero")]
    #[test_case("2008-13-01" ; "month thirteen")]
    #[test_case("2008-+1-01" ; "sign is not a digit")]
    #[test_case("2008-Jun-01" ; "named month")]
    #[test_case("2008-0" ; "truncated")]
    #[test_case("" ; "empty")]
    fn rejects_malformed_month(issue_date: &str) {
        assert_eq!(
            month_of(issue_date, DEFAULT_MONTH_OFFSET),
            Err(RecordError::MalformedDate {
                value: issue_date.to_string(),
                offset: DEFAULT_MONTH_OFFSET,
            })
        );
    }

    #[test]
    fn june_goes_to_index_five() {
        let table = EnrichedTable::new("2008", vec![record("2008-06-14T10:00:00", "a")]);
        let buckets = MonthRegrouper::default().regroup(vec![table]).unwrap();

        assert_eq!(tags(&buckets[5]), vec!["a"]);
        assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), 1);
    }

    #[test]
    fn stable_partition_across_years() {
        let y2001 = EnrichedTable::new(
            "2001",
            vec![
                record("2001-03-01", "a"),
                record("2001-07-04", "b"),
                record("2001-03-15", "c"),
            ],
        );
        let y2002 = EnrichedTable::new(
            "2002",
            vec![record("2002-07-01", "d"), record("2002-03-02", "e")],
        );

        let buckets = MonthRegrouper::default().regroup(vec![y2001, y2002]).unwrap();

        assert_eq!(tags(&buckets[2]), vec!["a", "c", "e"]);
        assert_eq!(tags(&buckets[6]), vec!["b", "d"]);
        assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), 5);
    }

    #[test]
    fn every_row_lands_in_exactly_one_bucket() {
        let tables: Vec<EnrichedTable> = (2001..2004)
            .map(|year| {
                let records = (0..40)
                    .map(|i| record(&format!("{}-{:02}-01", year, i % 12 + 1), &format!("{year}/{i}")))
                    .collect();
                EnrichedTable::new(year.to_string(), records)
            })
            .collect();
        let total: usize = tables.iter().map(EnrichedTable::len).sum();

        let buckets = MonthRegrouper::default().regroup(tables).unwrap();

        let mut seen: Vec<&str> = buckets.iter().flat_map(|b| tags(b)).collect();
        assert_eq!(seen.len(), total);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn malformed_row_names_table_and_row() {
        let table = EnrichedTable::new(
            "2005",
            vec![record("2005-02-01", "ok"), record("2005-xx-01", "bad")],
        );

        let err = MonthRegrouper::default().regroup(vec![table]).unwrap_err();

        assert_eq!(
            err,
            ProcessError::row(
                "2005",
                1,
                ISSUE_DATE_FIELD,
                RecordError::MalformedDate {
                    value: "2005-xx-01".to_string(),
                    offset: DEFAULT_MONTH_OFFSET,
                }
            )
        );
    }

    #[test]
    fn custom_offset() {
        let table = EnrichedTable::new("x", vec![record("14/06/2008", "a")]);
        let buckets = MonthRegrouper::new(3).regroup(vec![table]).unwrap();
        assert_eq!(tags(&buckets[5]), vec!["a"]);
    }

    #[test]
    fn incremental_append_tracks_counts() {
        let mut buckets = MonthlyBuckets::new(DEFAULT_MONTH_OFFSET);
        buckets
            .append(EnrichedTable::new("2010", vec![record("2010-04-01", "a"), record("2010-05-01", "b")]))
            .unwrap();
        buckets
            .append(EnrichedTable::new("2011", vec![record("2011-04-09", "c")]))
            .unwrap();

        assert_eq!(buckets.counts(), [0, 0, 0, 2, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(buckets.len(), 3);
        assert!(buckets.finish().is_ok());
    }

    #[test]
    fn lost_rows_fail_the_count_check() {
        let mut buckets = MonthlyBuckets::new(DEFAULT_MONTH_OFFSET);
        buckets
            .append(EnrichedTable::new("2010", vec![record("2010-04-01", "a")]))
            .unwrap();
        buckets.buckets[3].clear();

        assert_eq!(
            buckets.finish().unwrap_err(),
            ProcessError::RecordCountMismatch { expected: 1, actual: 0 }
        );
    }

    #[test]
    fn no_tables_yield_twelve_empty_buckets() {
        let buckets = MonthRegrouper::default().regroup(Vec::<EnrichedTable>::new()).unwrap();
        assert_eq!(buckets.len(), MONTHS);
        assert!(buckets.iter().all(Vec::is_empty));
    }
}
