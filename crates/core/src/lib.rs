pub mod phrases;
pub mod pipeline;
pub mod scoring;
pub mod shared;
pub mod speech;

pub use scoring::domain::pronunciation_scorer::{score_pronunciation, PronunciationScorer};
pub use scoring::domain::scoring_result::{ScoringResult, WordScore};
pub use scoring::domain::severity_band::SeverityBand;
