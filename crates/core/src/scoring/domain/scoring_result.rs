use serde::Serialize;

use super::severity_band::SeverityBand;

/// Score of one display token of the reference phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordScore {
    word: String,
    score: f64,
    #[serde(rename = "color")]
    band: SeverityBand,
}

impl WordScore {
    /// Builds a score and derives its band. `score` is clamped to [0, 100].
    pub fn new(word: impl Into<String>, score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        Self {
            word: word.into(),
            score,
            band: SeverityBand::classify(score),
        }
    }

    /// The original token, punctuation included.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn band(&self) -> SeverityBand {
        self.band
    }
}

/// Outcome of scoring one attempt at a phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    original_text: String,
    transcribed_text: String,
    word_scores: Vec<WordScore>,
    overall_score: f64,
}

impl ScoringResult {
    /// The overall score is the mean of `word_scores`, or 0 when there are none.
    pub fn new(
        original_text: impl Into<String>,
        transcribed_text: impl Into<String>,
        word_scores: Vec<WordScore>,
    ) -> Self {
        let overall_score = mean_score(&word_scores);
        Self {
            original_text: original_text.into(),
            transcribed_text: transcribed_text.into(),
            word_scores,
            overall_score,
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn transcribed_text(&self) -> &str {
        &self.transcribed_text
    }

    pub fn word_scores(&self) -> &[WordScore] {
        &self.word_scores
    }

    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn overall_band(&self) -> SeverityBand {
        SeverityBand::classify(self.overall_score)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn mean_score(word_scores: &[WordScore]) -> f64 {
    if word_scores.is_empty() {
        return 0.0;
    }
    let scores = word_scores.iter().map(WordScore::score);
    let min = scores.clone().fold(f64::INFINITY, f64::min);
    let max = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = scores.sum();
    // Rounding in the sum must not push the mean outside the observed range.
    (total / word_scores.len() as f64).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_word_score_derives_band() {
        let ws = WordScore::new("Hello,", 72.5);
        assert_eq!(ws.word(), "Hello,");
        assert_eq!(ws.band(), SeverityBand::Yellow);
    }

    #[test]
    fn test_word_score_clamps_out_of_range() {
        assert_eq!(WordScore::new("a", 120.0).score(), 100.0);
        assert_eq!(WordScore::new("a", -3.0).score(), 0.0);
    }

    #[test]
    fn test_overall_score_is_mean() {
        let result = ScoringResult::new(
            "a b c",
            "a b",
            vec![
                WordScore::new("a", 100.0),
                WordScore::new("b", 50.0),
                WordScore::new("c", 0.0),
            ],
        );
        assert_relative_eq!(result.overall_score(), 50.0);
        assert_eq!(result.overall_band(), SeverityBand::Orange);
    }

    #[test]
    fn test_overall_score_empty_is_zero() {
        let result = ScoringResult::new("", "anything", Vec::new());
        assert_eq!(result.overall_score(), 0.0);
    }

    #[test]
    fn test_json_uses_wire_field_names() {
        let result = ScoringResult::new("Hi!", "hi", vec![WordScore::new("Hi!", 100.0)]);
        let value: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value["original_text"], "Hi!");
        assert_eq!(value["transcribed_text"], "hi");
        assert_eq!(value["overall_score"], 100.0);
        assert_eq!(value["word_scores"][0]["word"], "Hi!");
        assert_eq!(value["word_scores"][0]["score"], 100.0);
        assert_eq!(value["word_scores"][0]["color"], "green");
    }
}
