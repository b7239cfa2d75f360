use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use log::{debug, warn};

use crate::utils::file_utils;

/// Placeholder for the four-digit year in input and per-year output templates
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Placeholder for the two-digit month in monthly output templates
pub const MONTH_PLACEHOLDER: &str = "{month}";

/// Maps years and months to file paths using string templates
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Yearly input files, e.g. `data/raw/warn-{year}.csv`
    input_template: String,

    /// Per-year output files, e.g. `data/warn-{year}-parsed.csv`
    output_template: String,

    /// Monthly output files, e.g. `data/monthly/warn-{month}.csv`
    monthly_template: String,
}

impl PathResolver {
    pub fn new(
        input_template: impl Into<String>,
        output_template: impl Into<String>,
        monthly_template: impl Into<String>,
    ) -> Self {
        Self {
            input_template: input_template.into(),
            output_template: output_template.into(),
            monthly_template: monthly_template.into(),
        }
    }

    pub fn input_path(&self, year: u16) -> PathBuf {
        PathBuf::from(self.input_template.replace(YEAR_PLACEHOLDER, &year.to_string()))
    }

    pub fn output_path(&self, year: u16) -> PathBuf {
        PathBuf::from(self.output_template.replace(YEAR_PLACEHOLDER, &year.to_string()))
    }

    /// Output path for a 1-based month, zero-padded to two digits
    pub fn monthly_output_path(&self, month: u8) -> PathBuf {
        PathBuf::from(self.monthly_template.replace(MONTH_PLACEHOLDER, &format!("{:02}", month)))
    }

    /// Find every year with an input file, by matching file names against the input template
    ///
    /// Only the template's file name may contain the year placeholder.
    pub fn discover_years(&self) -> Result<Vec<u16>> {
        let template = Path::new(&self.input_template);
        let file_pattern = match template.file_name().and_then(|name| name.to_str()) {
            Some(name) if name.contains(YEAR_PLACEHOLDER) => name,
            _ => bail!(
                "Input template {} has no {} in its file name",
                self.input_template,
                YEAR_PLACEHOLDER
            ),
        };
        let (prefix, suffix) = file_pattern
            .split_once(YEAR_PLACEHOLDER)
            .unwrap_or((file_pattern, ""));

        let dir = match template.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if dir.to_string_lossy().contains(YEAR_PLACEHOLDER) {
            bail!("Input template directory {} must not contain {}", dir.display(), YEAR_PLACEHOLDER);
        }

        debug!("Discovering input years in {}", dir.display());
        let mut years = Vec::new();
        for file in file_utils::files_in_dir(&dir)? {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let year = name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix))
                .filter(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<u16>().ok());

            if let Some(year) = year {
                years.push(year);
            }
        }

        years.sort_unstable();
        years.dedup();
        if years.is_empty() {
            warn!("No input files matching {} found in {}", file_pattern, dir.display());
        }
        Ok(years)
    }
}
