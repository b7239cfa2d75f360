use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use warning_preprocessor::config::{BatchConfig, BatchMode, MonthlySource, YearRange};
use warning_preprocessor::logging;
use warning_preprocessor::pipeline::BatchRunner;
use warning_preprocessor::warning::types::Strictness;

/// Enrich yearly severe-weather warning tables and regroup them by month
#[derive(Parser, Debug)]
#[command(name = "warning_preprocessor", version, about)]
struct Cli {
    /// TOML or YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output one file per year or one file per calendar month
    #[arg(short, long, value_enum)]
    mode: Option<BatchMode>,

    /// First year to process (inclusive)
    #[arg(long, requires = "end_year")]
    start_year: Option<u16>,

    /// Last year to process (inclusive)
    #[arg(long, requires = "start_year")]
    end_year: Option<u16>,

    /// Discover years from the input directory instead of using a range
    #[arg(long, conflicts_with_all = ["start_year", "end_year"])]
    discover: bool,

    /// Input path template containing {year}
    #[arg(long)]
    input_template: Option<String>,

    /// Per-year output path template containing {year}
    #[arg(long)]
    output_template: Option<String>,

    /// Monthly output path template containing {month}
    #[arg(long)]
    monthly_template: Option<String>,

    /// Read monthly input from existing per-year outputs instead of raw files
    #[arg(long, value_enum)]
    monthly_source: Option<MonthlySource>,

    /// Reject odd coordinate groups and labels with empty segments
    #[arg(long)]
    strict: bool,

    /// Threads for row transforms (1 disables parallelism)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Hide progress bars
    #[arg(long)]
    no_progress: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Load the configuration file, if any, and apply command-line overrides
    fn into_config(self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_file(path)?,
            None => BatchConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            config.years = Some(YearRange::new(start, end));
        }
        if self.discover {
            config.years = None;
        }
        if let Some(template) = self.input_template {
            config.input_template = template;
        }
        if let Some(template) = self.output_template {
            config.output_template = template;
        }
        if let Some(template) = self.monthly_template {
            config.monthly_output_template = template;
        }
        if let Some(source) = self.monthly_source {
            config.monthly_source = source;
        }
        if self.strict {
            config.strictness = Strictness::Strict;
        }
        if let Some(threads) = self.threads {
            config.parallel_threads = Some(threads);
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if let Some(path) = self.summary {
            config.summary_path = Some(path);
        }
        if let Some(path) = self.log_file {
            config.log_file = Some(path);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbose;
    let config = cli.into_config()?;

    logging::init_logging(verbosity, config.log_file.as_deref())?;

    let runner = BatchRunner::new(config)?;
    match runner.run() {
        Ok(summary) => {
            info!("Warning types seen: {}", summary.warning_types().into_iter().collect::<Vec<_>>().join(", "));
            Ok(())
        }
        Err(e) => {
            error!("Batch run failed: {:#}", e);
            Err(e)
        }
    }
}
