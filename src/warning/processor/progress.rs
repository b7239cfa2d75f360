use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rayon::prelude::*;

/// Tables smaller than this never get a progress bar
const MIN_ITEMS_FOR_BAR: usize = 1000;

/// Progress tracker for displaying progress while rows are transformed
#[derive(Debug, Default)]
pub struct ProgressTracker {
    enabled: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Map every item in parallel, returning results in input order
    ///
    /// `operation` receives the item's index alongside the item itself.
    pub fn track_parallel_progress<T, F, R>(&self, label: &str, items: Vec<T>, operation: F) -> Vec<R>
    where
        T: Send,
        F: Fn(usize, T) -> R + Sync + Send,
        R: Send,
    {
        let total = items.len();
        let progress_bar = self.progress_bar(label, total);
        let processed_count = AtomicUsize::new(0);

        let results: Vec<R> = items
            .into_par_iter()
            .enumerate()
            .map(|(index, item)| {
                let result = operation(index, item);

                let current_count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(pb) = &progress_bar {
                    // Update occasionally to avoid too many redraws
                    if current_count % 100 == 0 || current_count == total {
                        pb.set_position(current_count as u64);
                    }
                }

                result
            })
            .collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!("{} done", label));
        }

        results
    }

    /// Sequential counterpart of `track_parallel_progress`
    pub fn track_progress<T, F, R>(&self, label: &str, items: Vec<T>, operation: F) -> Vec<R>
    where
        F: Fn(usize, T) -> R,
    {
        let progress_bar = self.progress_bar(label, items.len());

        let results = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let result = operation(index, item);
                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }
                result
            })
            .collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!("{} done", label));
        }

        results
    }

    fn progress_bar(&self, label: &str, total: usize) -> Option<ProgressBar> {
        if !self.enabled || total < MIN_ITEMS_FOR_BAR {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows {msg} ({eta})")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => warn!("Invalid progress bar template: {}", e),
        }
        pb.set_message(label.to_string());
        Some(pb)
    }
}
