use super::scoring_config::ScoringConfig;
use super::scoring_result::{ScoringResult, WordScore};
use super::text_normalizer::{normalize, normalize_word};
use super::word_similarity::{similarity, EXACT_MATCH};

/// Aligns a transcript onto the reference phrase and scores every word.
///
/// Each display token of the reference is matched against the best-scoring
/// transcript word anywhere in the transcript, discounted by
/// `position_discount`, and against the transcript word at the same index,
/// undiscounted. The higher of the two wins. This tolerates a recognizer that
/// drops, merges or reorders words without giving a misplaced word full credit.
#[derive(Debug, Clone, Default)]
pub struct PronunciationScorer {
    config: ScoringConfig,
}

impl PronunciationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores `transcribed_text` against `original_text`. Never fails.
    pub fn score(&self, original_text: &str, transcribed_text: &str) -> ScoringResult {
        let transcript_words = normalize(transcribed_text);
        if transcript_words.is_empty() && !original_text.trim().is_empty() {
            log::warn!("Empty transcript for phrase {original_text:?}");
        }

        let word_scores = original_text
            .split_whitespace()
            .enumerate()
            .map(|(index, display_word)| {
                let score = self.score_word(display_word, index, &transcript_words);
                WordScore::new(display_word, score)
            })
            .collect();

        ScoringResult::new(original_text, transcribed_text, word_scores)
    }

    fn score_word(&self, display_word: &str, index: usize, transcript_words: &[String]) -> f64 {
        let word = normalize_word(display_word);
        if word.is_empty() {
            // punctuation cannot be mispronounced
            return EXACT_MATCH;
        }
        if transcript_words.is_empty() {
            return 0.0;
        }

        let best = transcript_words
            .iter()
            .map(|candidate| similarity(&word, candidate))
            .fold(0.0, f64::max);

        let score = match transcript_words.get(index) {
            Some(counterpart) => {
                let positional = similarity(&word, counterpart);
                (best * self.config.position_discount).max(positional)
            }
            None => best,
        };

        log::debug!("{display_word:?} -> {word:?}: best {best:.1}, final {score:.1}");
        score
    }
}

/// Scores with the default configuration.
pub fn score_pronunciation(original_text: &str, transcribed_text: &str) -> ScoringResult {
    PronunciationScorer::default().score(original_text, transcribed_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::severity_band::SeverityBand;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn scores(result: &ScoringResult) -> Vec<f64> {
        result.word_scores().iter().map(WordScore::score).collect()
    }

    #[test]
    fn test_exact_transcript_scores_100() {
        let result = score_pronunciation("Hello, how are you?", "hello how are you");
        assert_eq!(result.word_scores().len(), 4);
        let words: Vec<&str> = result.word_scores().iter().map(WordScore::word).collect();
        assert_eq!(words, ["Hello,", "how", "are", "you?"]);
        for ws in result.word_scores() {
            assert_eq!(ws.score(), 100.0);
            assert_eq!(ws.band(), SeverityBand::Green);
        }
        assert_eq!(result.overall_score(), 100.0);
    }

    #[test]
    fn test_substituted_word_scores_partially() {
        let result = score_pronunciation("I like apples", "I like oranges");
        let s = scores(&result);
        assert_eq!(s[0], 100.0);
        assert_eq!(s[1], 100.0);
        assert!(s[2] > 0.0 && s[2] < 100.0);
        assert_relative_eq!(s[2], 600.0 / 13.0, epsilon = 1e-9);
        assert_eq!(result.word_scores()[2].band(), SeverityBand::Red);
    }

    #[test]
    fn test_empty_transcript_scores_every_word_zero() {
        let result = score_pronunciation("Thank you", "");
        assert_eq!(scores(&result), [0.0, 0.0]);
        for ws in result.word_scores() {
            assert_eq!(ws.band(), SeverityBand::Red);
        }
        assert_eq!(result.overall_score(), 0.0);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  \t ")]
    fn test_empty_original_yields_no_scores(#[case] original: &str) {
        let result = score_pronunciation(original, "hello there");
        assert!(result.word_scores().is_empty());
        assert_eq!(result.overall_score(), 0.0);
    }

    #[test]
    fn test_punctuation_token_scores_100_even_without_transcript() {
        let result = score_pronunciation("Wait - what", "");
        assert_eq!(scores(&result), [0.0, 100.0, 0.0]);
        assert_eq!(result.word_scores()[1].word(), "-");
        assert_eq!(result.word_scores()[1].band(), SeverityBand::Green);
    }

    #[test]
    fn test_all_punctuation_phrase_is_green() {
        let result = score_pronunciation("?! ...", "hello");
        assert_eq!(scores(&result), [100.0, 100.0]);
        assert_eq!(result.overall_score(), 100.0);
    }

    #[test]
    fn test_misplaced_word_is_discounted() {
        // "you" is at index 0 of the transcript but index 1 of the phrase
        let result = score_pronunciation("thank you", "you thank");
        assert_relative_eq!(scores(&result)[0], 80.0);
        assert_relative_eq!(scores(&result)[1], 80.0);
    }

    #[test]
    fn test_word_beyond_transcript_length_uses_best_match_undiscounted() {
        let result = score_pronunciation("my name is John", "John");
        let s = scores(&result);
        assert_eq!(s[3], 100.0);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_close_positional_match_beats_discounted_exact_match() {
        // "helo" in place (800/9) outranks the exact "hello" one slot later (80)
        let result = score_pronunciation("hello world", "helo hello");
        assert_relative_eq!(scores(&result)[0], 800.0 / 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_discount_changes_blend() {
        let scorer = PronunciationScorer::new(ScoringConfig::default().with_position_discount(1.0));
        let result = scorer.score("thank you", "you thank");
        assert_eq!(scores(&result), [100.0, 100.0]);
    }

    #[test]
    fn test_word_count_matches_whitespace_tokens() {
        let phrases = [
            "Although the circumstances were challenging, she persevered through determination.",
            "She's been working at the hospital since 2020.",
            "  spaced   out  ",
            "- -- ---",
        ];
        for phrase in phrases {
            for transcript in ["", "she", "although the circumstances"] {
                let result = score_pronunciation(phrase, transcript);
                assert_eq!(
                    result.word_scores().len(),
                    phrase.split_whitespace().count()
                );
            }
        }
    }

    #[test]
    fn test_overall_score_within_word_score_range() {
        let result = score_pronunciation("The weather is nice today.", "the whether is nice to day");
        let s = scores(&result);
        let min = s.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = s.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(result.overall_score() >= min && result.overall_score() <= max);
    }

    #[test]
    fn test_result_keeps_raw_texts() {
        let result = score_pronunciation("Hi there!", " hi there ");
        assert_eq!(result.original_text(), "Hi there!");
        assert_eq!(result.transcribed_text(), " hi there ");
    }
}
