use super::audio_segment::AudioSegment;

/// Domain interface for speech-to-text transcription.
///
/// Implementations return best-effort plain text, which may be empty when
/// nothing intelligible was said. One instance is shared by every concurrent
/// scoring run, so implementations must not hold per-call mutable state.
pub trait SpeechRecognizer: Send + Sync {
    fn transcribe(&self, audio: &AudioSegment) -> Result<String, Box<dyn std::error::Error>>;
}
