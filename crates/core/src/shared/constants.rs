pub const WHISPER_MODEL_NAME: &str = "ggml-base.en.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";

/// Whisper only accepts 16 kHz mono input.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Directory name used under the platform cache/config directories.
pub const APP_DIR_NAME: &str = "EnLearn";
