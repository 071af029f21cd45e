use serde::Serialize;

use super::scoring_result::ScoringResult;
use super::severity_band::SeverityBand;

/// Overall score at which a phrase counts as mastered.
pub const MASTERY_THRESHOLD: f64 = 80.0;

/// Aggregate over several attempts in one practice session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub attempts: usize,
    pub average_score: f64,
    pub mastered: usize,
    pub band: SeverityBand,
}

impl SessionSummary {
    pub fn from_results(results: &[ScoringResult]) -> Self {
        let attempts = results.len();
        let average_score = if attempts == 0 {
            0.0
        } else {
            results.iter().map(ScoringResult::overall_score).sum::<f64>() / attempts as f64
        };
        let mastered = results
            .iter()
            .filter(|r| r.overall_score() >= MASTERY_THRESHOLD)
            .count();

        Self {
            attempts,
            average_score,
            mastered,
            band: SeverityBand::classify(average_score),
        }
    }
}
