use approx::assert_relative_eq;
use enlearn_core::phrases::domain::phrase_catalog::PhraseCatalog;
use enlearn_core::scoring::domain::scoring_config::ScoringConfig;
use enlearn_core::scoring::domain::session_summary::SessionSummary;
use enlearn_core::{score_pronunciation, PronunciationScorer, SeverityBand};

#[test]
fn perfect_reading_of_every_builtin_phrase_scores_100() {
    let catalog = PhraseCatalog::builtin();
    for phrase in catalog.all() {
        let transcript = phrase.text.to_lowercase();
        let result = score_pronunciation(&phrase.text, &transcript);
        assert_eq!(
            result.word_scores().len(),
            phrase.text.split_whitespace().count()
        );
        assert_eq!(result.overall_score(), 100.0, "{}", phrase.text);
    }
}

#[test]
fn greeting_with_punctuation_matches_plain_transcript() {
    let result = score_pronunciation("Hello, how are you?", "hello how are you");
    let words: Vec<(&str, f64, SeverityBand)> = result
        .word_scores()
        .iter()
        .map(|ws| (ws.word(), ws.score(), ws.band()))
        .collect();
    assert_eq!(
        words,
        [
            ("Hello,", 100.0, SeverityBand::Green),
            ("how", 100.0, SeverityBand::Green),
            ("are", 100.0, SeverityBand::Green),
            ("you?", 100.0, SeverityBand::Green),
        ]
    );
    assert_eq!(result.overall_score(), 100.0);
}

#[test]
fn substituted_word_is_red_and_drags_average_down() {
    let result = score_pronunciation("I like apples", "I like oranges");
    let apples = &result.word_scores()[2];
    assert_relative_eq!(apples.score(), 600.0 / 13.0, epsilon = 1e-9);
    assert_eq!(apples.band(), SeverityBand::Red);
    assert_relative_eq!(
        result.overall_score(),
        (200.0 + 600.0 / 13.0) / 3.0,
        epsilon = 1e-9
    );
}

#[test]
fn silence_scores_every_word_red() {
    let result = score_pronunciation("Thank you", "");
    for ws in result.word_scores() {
        assert_eq!(ws.score(), 0.0);
        assert_eq!(ws.band(), SeverityBand::Red);
    }
    assert_eq!(result.overall_score(), 0.0);
}

#[test]
fn empty_phrase_has_no_words() {
    let result = score_pronunciation("", "anything at all");
    assert!(result.word_scores().is_empty());
    assert_eq!(result.overall_score(), 0.0);
}

#[test]
fn dropped_word_shifts_positions_but_keeps_credit() {
    // "to" dropped: later words are found one slot early and discounted
    let result = score_pronunciation("I like to eat apples.", "I like eat apples");
    let scores: Vec<f64> = result.word_scores().iter().map(|w| w.score()).collect();
    assert_eq!(scores[0], 100.0);
    assert_eq!(scores[1], 100.0);
    assert_relative_eq!(scores[3], 80.0);
    assert_relative_eq!(scores[4], 100.0);
}

#[test]
fn discount_of_one_ignores_word_order() {
    let scorer = PronunciationScorer::new(ScoringConfig::default().with_position_discount(1.0));
    let result = scorer.score("I like to eat apples.", "apples eat to like I");
    assert_eq!(result.overall_score(), 100.0);
}

#[test]
fn session_summary_over_mixed_attempts() {
    let results = vec![
        score_pronunciation("Hello, how are you?", "hello how are you"),
        score_pronunciation("I like apples", "I like oranges"),
        score_pronunciation("Thank you", ""),
    ];
    let summary = SessionSummary::from_results(&results);
    assert_eq!(summary.attempts, 3);
    assert_eq!(summary.mastered, 2);
    assert!(summary.average_score > 0.0 && summary.average_score < 100.0);
}
