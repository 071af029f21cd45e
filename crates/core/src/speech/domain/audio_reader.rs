use std::path::Path;

use super::audio_segment::AudioSegment;

/// Domain interface for decoding a recorded attempt.
pub trait AudioReader: Send + Sync {
    /// Decode the file to mono PCM at `target_sample_rate`.
    /// Returns `None` if the file has no audio stream.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>>;
}
