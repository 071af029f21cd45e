pub mod batch_scoring_executor;
pub mod infrastructure;
pub mod score_recording_use_case;
