use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use super::error::WatermarkError;
use super::process::process_file;
use super::types::{BatchStats, ProcessOptions, ProcessResult};

/// Drives a batch over the candidate files of a path: discovery, dispatch
/// to the per-file processor, and aggregation of outcome counts.
///
/// The cancel flag stops dispatch of new work; units already submitted run
/// to completion and are counted, so an interrupted run still reports the
/// stats of everything that finished.
pub struct BatchProcessor {
    options: Arc<ProcessOptions>,
    cancel: Arc<AtomicBool>,
}

impl BatchProcessor {
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options: Arc::new(options),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag a signal handler can set to stop dispatching new files.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Process every candidate under `path` and return the aggregate counts
    /// once all dispatched work has completed.
    pub async fn process_path(
        &self,
        path: &Path,
        recursive: bool,
        workers: usize,
    ) -> Result<BatchStats, WatermarkError> {
        let candidates = discover_candidates(path, recursive)?;
        info!(
            "Discovered {} candidate file(s) under {}",
            candidates.len(),
            path.display()
        );

        let stats = if workers <= 1 {
            self.run_sequential(candidates).await
        } else {
            self.run_pool(candidates, workers).await
        };

        Ok(stats)
    }

    /// Sequential dispatch in discovery order.
    async fn run_sequential(&self, candidates: Vec<PathBuf>) -> BatchStats {
        let mut stats = BatchStats::default();

        for candidate in candidates {
            if self.cancel.load(Ordering::Relaxed) {
                warn!("Interrupted, not dispatching further files");
                break;
            }

            let options = self.options.clone();
            let completion =
                tokio::task::spawn_blocking(move || process_file(&candidate, &options)).await;
            record_completion(&mut stats, completion);
        }

        stats
    }

    /// Bounded pool: at most `workers` files are in flight at a time, and
    /// completion order is unspecified. Counts are aggregated at the join
    /// site, so no counter is shared between units.
    async fn run_pool(&self, candidates: Vec<PathBuf>, workers: usize) -> BatchStats {
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        for candidate in candidates {
            if self.cancel.load(Ordering::Relaxed) {
                warn!("Interrupted, not dispatching further files");
                break;
            }

            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let options = self.options.clone();
            tasks.spawn(async move {
                let completion =
                    tokio::task::spawn_blocking(move || process_file(&candidate, &options)).await;
                drop(permit);
                completion
            });
        }

        let mut stats = BatchStats::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(completion) => record_completion(&mut stats, completion),
                Err(e) => {
                    error!("Worker task failed: {}", e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// Every completed unit increments exactly one counter; a unit that
/// panicked out of the processor still counts as failed.
fn record_completion(stats: &mut BatchStats, completion: Result<ProcessResult, JoinError>) {
    match completion {
        Ok(result) => stats.record(&result),
        Err(e) => {
            error!("Worker panicked: {}", e);
            stats.failed += 1;
        }
    }
}

/// Enumerate candidate files. A file path is its own candidate set
/// regardless of extension; a directory is walked (top level only unless
/// recursive) and filtered to the supported image extensions. Anything
/// else is a fatal `NotFound`.
pub(crate) fn discover_candidates(
    path: &Path,
    recursive: bool,
) -> Result<Vec<PathBuf>, WatermarkError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(WatermarkError::NotFound(path.to_path_buf()));
    }

    let mut walker = WalkDir::new(path).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut candidates = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() && is_candidate(&entry.file_name().to_string_lossy()) {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}

fn is_candidate(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
}
