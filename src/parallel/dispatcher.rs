//! Fixed-size worker pool with a shared job queue and a failure fan-in channel

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::error::{Result, GalleryError};
use crate::parallel::progress::ProgressTracker;

/// Runs one job per image on a fixed number of OS threads.
///
/// The pool only lives for the duration of a single [`WorkDispatcher::run`]
/// call; nothing is kept between runs.
#[derive(Debug, Clone, Copy)]
pub struct WorkDispatcher {
    workers: usize,
}

impl WorkDispatcher {
    /// Create a dispatcher with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per logical CPU
    pub fn with_available_parallelism() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job` for every image and return the images whose job failed.
    ///
    /// Jobs record their own artifact counts on `progress`; the dispatcher
    /// only tracks which images completed and which failed.
    ///
    /// All images are queued before any worker starts and the queue holds
    /// all of them, so enqueueing never blocks. Failures are drained by a
    /// collector thread while the workers run; the returned set is read only
    /// after every worker has exited and the failure channel is closed.
    pub fn run<F>(
        &self,
        images: Vec<String>,
        progress: &ProgressTracker,
        job: F,
    ) -> Result<BTreeSet<String>>
    where
        F: Fn(&str) -> Result<()> + Sync,
    {
        if images.is_empty() {
            return Ok(BTreeSet::new());
        }

        info!("Dispatching {} images to {} workers", images.len(), self.workers);

        let (job_tx, job_rx) = channel::bounded::<String>(images.len());
        let (failure_tx, failure_rx) = channel::unbounded::<String>();

        for image in images {
            job_tx
                .send(image)
                .map_err(|e| GalleryError::parallel(format!("Job queue closed early: {}", e)))?;
        }
        drop(job_tx);

        let job = &job;
        let workers = self.workers;

        crossbeam::scope(|scope| {
            let collector = scope.spawn(move |_| failure_rx.iter().collect::<BTreeSet<String>>());

            for worker_id in 0..workers {
                let jobs = job_rx.clone();
                let failures = failure_tx.clone();
                scope.spawn(move |_| run_worker(worker_id, &jobs, &failures, job, progress));
            }

            // Only worker clones remain; the channel closes when the last worker exits
            drop(failure_tx);

            collector.join()
        })
        .map_err(|_| GalleryError::parallel("A worker thread panicked"))?
        .map_err(|_| GalleryError::parallel("Failure collector panicked"))
    }
}

impl Default for WorkDispatcher {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

fn run_worker<F>(
    worker_id: usize,
    jobs: &Receiver<String>,
    failures: &Sender<String>,
    job: &F,
    progress: &ProgressTracker,
) where
    F: Fn(&str) -> Result<()>,
{
    for image in jobs.iter() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(&image)))
            .unwrap_or_else(|_| Err(GalleryError::WorkerPanic { image: image.clone() }));

        match outcome {
            Ok(()) => progress.complete_item(&image, true),
            Err(e) => {
                warn!("Skipping {}: {}", image, e.user_message());
                progress.complete_item(&image, false);

                if failures.send(image).is_err() {
                    error!("Failure channel closed while worker {} was running", worker_id);
                }
            }
        }
    }

    debug!("Worker {} drained the queue", worker_id);
}
