use std::path::PathBuf;

use serde::Deserialize;

use crate::pipeline::score_recording_use_case::{ScoreRecordingError, ScoreRecordingUseCase};
use crate::scoring::domain::scoring_result::ScoringResult;

/// One recorded attempt at a phrase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordingJob {
    pub audio: PathBuf,
    pub phrase: String,
}

pub type JobOutcome = Result<ScoringResult, ScoreRecordingError>;

/// Progress callback: `(completed, total)`.
pub type BatchProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Abstracts how a batch of recordings is scored.
///
/// Outcomes are returned in job order; a failed job never stops the rest.
pub trait BatchScoringExecutor: Send {
    fn execute(
        &self,
        use_case: &ScoreRecordingUseCase,
        jobs: &[RecordingJob],
        on_progress: Option<BatchProgressFn<'_>>,
    ) -> Vec<JobOutcome>;
}
