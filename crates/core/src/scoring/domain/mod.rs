pub mod pronunciation_scorer;
pub mod scoring_config;
pub mod scoring_result;
pub mod session_summary;
pub mod severity_band;
pub mod text_normalizer;
pub mod word_similarity;
