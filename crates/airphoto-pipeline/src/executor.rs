//! Batch execution over an image collection.
//!
//! Each per-image operation is a pure function of one image plus shared
//! read-only context, so items are dispatched independently on a fixed-size
//! worker pool with no ordering guarantee. Output names derive from input
//! stems, so completion order never affects correctness.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::collection::image_id;
use crate::error::PipelineError;

/// What to do when a single image fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop dispatching new work on the first failure and propagate it.
    ///
    /// Already-running items complete; there is no coordinated cancellation.
    #[default]
    Halt,

    /// Record the failure with its image identifier and keep going.
    Skip,
}

/// One failed unit of work.
#[derive(Debug)]
pub struct BatchFailure {
    /// The identifier of the image that failed.
    pub image_id: String,
    /// What went wrong.
    pub error: PipelineError,
}

/// The aggregated outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// How many images completed successfully.
    pub completed: usize,
    /// The failed images, in no particular order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every image completed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The default worker count: available parallelism minus one, at least 1.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Apply `op` to every image on a fixed-size worker pool.
///
/// # Arguments
///
/// * `images` - The work items; each is processed exactly once.
/// * `workers` - The pool size; values below 1 are clamped to 1.
/// * `policy` - Whether a failing image halts the batch or is skipped.
/// * `op` - The per-image operation; must not depend on any other item.
///
/// # Errors
///
/// With [`FailurePolicy::Halt`] the first per-image error is returned.
/// [`PipelineError::ThreadPool`] when the pool cannot be built.
pub fn for_each_image(
    images: &[PathBuf],
    workers: usize,
    policy: FailurePolicy,
    op: impl Fn(&Path) -> Result<(), PipelineError> + Send + Sync,
) -> Result<BatchReport, PipelineError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;

    log::info!(
        "dispatching {} images on {} workers",
        images.len(),
        workers.max(1)
    );

    match policy {
        FailurePolicy::Halt => {
            pool.install(|| images.par_iter().try_for_each(|path| op(path)))?;
            Ok(BatchReport {
                completed: images.len(),
                failures: Vec::new(),
            })
        }
        FailurePolicy::Skip => {
            let failures: Vec<BatchFailure> = pool.install(|| {
                images
                    .par_iter()
                    .filter_map(|path| {
                        op(path).err().map(|error| BatchFailure {
                            image_id: image_id(path),
                            error,
                        })
                    })
                    .collect()
            });

            for failure in &failures {
                log::warn!("image '{}' failed: {}", failure.image_id, failure.error);
            }

            Ok(BatchReport {
                completed: images.len() - failures.len(),
                failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn items(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn runs_every_item() -> Result<(), PipelineError> {
        let images = items(&["a.tif", "b.tif", "c.tif"]);
        let count = AtomicUsize::new(0);

        let report = for_each_image(&images, 2, FailurePolicy::Halt, |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })?;

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(report.completed, 3);
        assert!(report.is_complete());
        Ok(())
    }

    #[test]
    fn halt_propagates_first_failure() {
        let images = items(&["a.tif", "bad.tif", "c.tif"]);

        let res = for_each_image(&images, 1, FailurePolicy::Halt, |path| {
            if image_id(path) == "bad" {
                Err(PipelineError::RecordNotFound("bad".into()))
            } else {
                Ok(())
            }
        });

        assert!(matches!(res, Err(PipelineError::RecordNotFound(_))));
    }

    #[test]
    fn skip_collects_failures_and_continues() -> Result<(), PipelineError> {
        let images = items(&["a.tif", "bad.tif", "c.tif", "worse.tif"]);

        let report = for_each_image(&images, 2, FailurePolicy::Skip, |path| {
            let id = image_id(path);
            if id == "bad" || id == "worse" {
                Err(PipelineError::RecordNotFound(id))
            } else {
                Ok(())
            }
        })?;

        assert_eq!(report.completed, 2);
        assert_eq!(report.failures.len(), 2);
        assert!(!report.is_complete());
        let mut failed: Vec<_> = report.failures.iter().map(|f| f.image_id.as_str()).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["bad", "worse"]);
        Ok(())
    }

    #[test]
    fn worker_count_is_at_least_one() {
        assert!(default_worker_count() >= 1);

        // a zero request is clamped rather than rejected
        let report = for_each_image(&items(&["a.tif"]), 0, FailurePolicy::Halt, |_| Ok(()));
        assert!(report.is_ok());
    }
}
