use crate::pipeline::batch_scoring_executor::{
    BatchProgressFn, BatchScoringExecutor, JobOutcome, RecordingJob,
};
use crate::pipeline::score_recording_use_case::ScoreRecordingUseCase;

/// Scores recordings on a fixed pool of worker threads fed from a shared queue.
///
/// Workers borrow the use case, so the loaded speech model is shared rather
/// than reloaded per thread.
pub struct ThreadedBatchExecutor {
    workers: usize,
}

impl ThreadedBatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedBatchExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl BatchScoringExecutor for ThreadedBatchExecutor {
    fn execute(
        &self,
        use_case: &ScoreRecordingUseCase,
        jobs: &[RecordingJob],
        on_progress: Option<BatchProgressFn<'_>>,
    ) -> Vec<JobOutcome> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &RecordingJob)>();
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, JobOutcome)>();
        for job in jobs.iter().enumerate() {
            // The receiver is still alive here.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let mut outcomes: Vec<Option<JobOutcome>> = vec![None; total];

        std::thread::scope(|scope| {
            for _ in 0..self.workers.min(total) {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for (index, job) in job_rx {
                        let outcome = use_case.run(&job.audio, &job.phrase);
                        if let Err(e) = &outcome {
                            log::warn!("Failed to score {}: {e}", job.audio.display());
                        }
                        if done_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            for (completed, (index, outcome)) in done_rx.iter().enumerate() {
                outcomes[index] = Some(outcome);
                if let Some(cb) = on_progress {
                    cb(completed + 1, total);
                }
            }
        });

        outcomes.into_iter().flatten().collect()
    }
}
