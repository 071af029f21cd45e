use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::shared::constants::{DEFAULT_LANGUAGE, WHISPER_SAMPLE_RATE};
use crate::speech::domain::audio_segment::AudioSegment;
use crate::speech::domain::speech_recognizer::SpeechRecognizer;

/// Inference settings for [`WhisperRecognizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperConfig {
    /// Language code passed to whisper, `None` for auto-detection.
    pub language: Option<String>,
    pub n_threads: usize,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            language: Some(DEFAULT_LANGUAGE.to_string()),
            n_threads: num_cpus().min(4),
        }
    }
}

impl WhisperConfig {
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.n_threads = n.max(1);
        self
    }
}

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The model is loaded once when the recognizer is built and shared by every
/// transcription; each call gets its own inference state, so one recognizer
/// can serve concurrent callers.
pub struct WhisperRecognizer {
    model_path: PathBuf,
    context: WhisperContext,
    config: WhisperConfig,
}

impl WhisperRecognizer {
    pub fn new(
        model_path: &Path,
        config: WhisperConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }

        log::info!("Loading Whisper model from {}", model_path.display());
        let context = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        Ok(Self {
            model_path: model_path.to_path_buf(),
            context,
            config,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioSegment) -> Result<String, Box<dyn std::error::Error>> {
        if audio.sample_rate() != WHISPER_SAMPLE_RATE {
            return Err(format!(
                "Whisper expects {WHISPER_SAMPLE_RATE} Hz audio, got {} Hz",
                audio.sample_rate()
            )
            .into());
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.config.language.as_deref());
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(self.config.n_threads as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut pieces = Vec::new();
        for seg_idx in 0..state.full_n_segments() {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };
            for tok_idx in 0..segment.n_tokens() {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                if let Ok(text) = token.to_str() {
                    pieces.push(text.to_string());
                }
            }
        }

        let text = join_tokens(pieces.iter().map(String::as_str));
        log::info!("Transcribed {:.1}s of audio: {text:?}", audio.duration());
        Ok(text)
    }
}

/// Concatenates token text, dropping control tokens like `[_BEG_]` and
/// `<|endoftext|>`. Word tokens carry their own leading space.
fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let joined: String = tokens.filter(|t| !is_special_token(t)).collect();
    joined.trim().to_string()
}

fn is_special_token(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with("[_") || trimmed.starts_with("<|")
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
