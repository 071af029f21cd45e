use std::path::Path;

use thiserror::Error;

use crate::scoring::domain::pronunciation_scorer::PronunciationScorer;
use crate::scoring::domain::scoring_result::ScoringResult;
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::speech::domain::audio_reader::AudioReader;
use crate::speech::domain::speech_recognizer::SpeechRecognizer;

/// Peak amplitude below which a recording is reported as silent.
const SILENCE_PEAK: f32 = 1e-3;

/// Why a recording could not be processed. Scoring itself never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreRecordingError {
    #[error("recording has no audio stream")]
    NoAudio,
    #[error("failed to decode recording: {0}")]
    Decode(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Decode → transcribe → score for a single recorded attempt.
///
/// Holds no per-run state, so one instance can be shared by reference
/// across worker threads.
pub struct ScoreRecordingUseCase {
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
    scorer: PronunciationScorer,
}

impl ScoreRecordingUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
        scorer: PronunciationScorer,
    ) -> Self {
        Self {
            reader,
            recognizer,
            scorer,
        }
    }

    pub fn run(
        &self,
        audio_path: &Path,
        original_text: &str,
    ) -> Result<ScoringResult, ScoreRecordingError> {
        let audio = self
            .reader
            .read_audio(audio_path, WHISPER_SAMPLE_RATE)
            .map_err(|e| ScoreRecordingError::Decode(e.to_string()))?
            .ok_or(ScoreRecordingError::NoAudio)?;

        let transcript = if audio.is_empty() {
            log::warn!("{} decoded to zero samples", audio_path.display());
            String::new()
        } else {
            if audio.peak() < SILENCE_PEAK {
                log::warn!("{} appears to be silent", audio_path.display());
            }
            self.recognizer
                .transcribe(&audio)
                .map_err(|e| ScoreRecordingError::Transcription(e.to_string()))?
        };

        let result = self.scorer.score(original_text, transcript.trim());
        log::info!(
            "Scored {}: {:.1} ({})",
            audio_path.display(),
            result.overall_score(),
            result.overall_band()
        );
        Ok(result)
    }
}
