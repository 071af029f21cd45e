mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use enlearn_core::phrases::domain::difficulty::Difficulty;
use enlearn_core::phrases::domain::phrase_catalog::PhraseCatalog;
use enlearn_core::phrases::infrastructure::json_phrase_loader;
use enlearn_core::pipeline::batch_scoring_executor::{
    BatchProgressFn, BatchScoringExecutor, JobOutcome, RecordingJob,
};
use enlearn_core::pipeline::infrastructure::threaded_batch_executor::ThreadedBatchExecutor;
use enlearn_core::pipeline::score_recording_use_case::ScoreRecordingUseCase;
use enlearn_core::scoring::domain::scoring_config::{ScoringConfig, DEFAULT_POSITION_DISCOUNT};
use enlearn_core::scoring::domain::session_summary::SessionSummary;
use enlearn_core::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use enlearn_core::shared::model_resolver;
use enlearn_core::speech::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use enlearn_core::speech::infrastructure::whisper_recognizer::{WhisperConfig, WhisperRecognizer};
use enlearn_core::{PronunciationScorer, ScoringResult};

use settings::Settings;

/// Pronunciation practice: score recordings against reference phrases.
#[derive(Parser)]
#[command(name = "enlearn", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Whisper model file (downloaded to the user cache when omitted).
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Spoken language code, or "auto" to let Whisper detect it.
    #[arg(long, global = true)]
    language: Option<String>,

    /// Threads used by one Whisper inference.
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Weight (0.0-1.0) of a word matched away from its expected position.
    #[arg(long, global = true)]
    position_discount: Option<f64>,

    /// JSON file replacing the built-in practice phrases.
    #[arg(long, global = true)]
    phrases_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a recording and score it against a phrase.
    Score {
        /// Recorded audio file.
        audio: PathBuf,

        /// Phrase the speaker was reading.
        #[arg(
            long,
            required_unless_present = "phrase_id",
            conflicts_with = "phrase_id"
        )]
        phrase: Option<String>,

        /// Id of a practice phrase (see `enlearn phrases`).
        #[arg(long)]
        phrase_id: Option<u32>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Score a transcript against a phrase without any audio.
    Compare {
        #[arg(long)]
        original: String,

        #[arg(long)]
        transcript: String,

        #[arg(long)]
        json: bool,
    },
    /// List practice phrases.
    Phrases {
        /// Only show one level: basic, intermediate or advanced.
        #[arg(long)]
        level: Option<Difficulty>,

        #[arg(long)]
        json: bool,
    },
    /// Score every recording listed in a JSON manifest.
    Batch {
        /// JSON array of {"audio": path, "phrase": text}.
        manifest: PathBuf,

        /// Recordings scored in parallel.
        #[arg(long)]
        workers: Option<usize>,

        #[arg(long)]
        json: bool,
    },
}

/// Command-line flags merged over the settings file.
struct Options {
    model: Option<PathBuf>,
    language: Option<String>,
    threads: Option<usize>,
    position_discount: f64,
    workers: Option<usize>,
    phrases_file: Option<PathBuf>,
}

impl Options {
    fn merge(cli: &Cli, settings: Settings) -> Self {
        let workers = match &cli.command {
            Command::Batch { workers, .. } => workers.or(settings.workers),
            _ => settings.workers,
        };
        Self {
            model: cli.model.clone().or(settings.model_path),
            language: cli.language.clone().or(settings.language),
            threads: cli.threads.or(settings.threads),
            position_discount: cli
                .position_discount
                .or(settings.position_discount)
                .unwrap_or(DEFAULT_POSITION_DISCOUNT),
            workers,
            phrases_file: cli.phrases_file.clone().or(settings.phrases_file),
        }
    }

    fn scorer(&self) -> PronunciationScorer {
        PronunciationScorer::new(
            ScoringConfig::default().with_position_discount(self.position_discount),
        )
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let options = Options::merge(&cli, Settings::load());
    validate(&cli, &options)?;

    match &cli.command {
        Command::Score {
            audio,
            phrase,
            phrase_id,
            json,
        } => {
            let phrase = match (phrase, phrase_id) {
                (Some(text), _) => text.clone(),
                (None, Some(id)) => load_catalog(&options)?
                    .get(*id)
                    .map(|p| p.text.clone())
                    .ok_or_else(|| format!("No practice phrase with id {id}"))?,
                (None, None) => return Err("Either --phrase or --phrase-id is required".into()),
            };
            run_score(audio, &phrase, &options, *json)
        }
        Command::Compare {
            original,
            transcript,
            json,
        } => {
            let result = options.scorer().score(original, transcript);
            print_result(&result, *json);
            Ok(())
        }
        Command::Phrases { level, json } => run_phrases(&load_catalog(&options)?, *level, *json),
        Command::Batch { manifest, json, .. } => run_batch(manifest, &options, *json),
    }
}

fn run_score(
    audio: &Path,
    phrase: &str,
    options: &Options,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = build_use_case(options)?;
    let result = use_case.run(audio, phrase)?;
    print_result(&result, json);
    Ok(())
}

fn run_phrases(
    catalog: &PhraseCatalog,
    level: Option<Difficulty>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.listing())?);
        return Ok(());
    }

    for difficulty in Difficulty::ALL {
        if level.is_some_and(|l| l != *difficulty) {
            continue;
        }
        println!("{difficulty}:");
        for phrase in catalog.phrases(*difficulty) {
            println!("  {:>3}  {}", phrase.id, phrase.text);
        }
    }
    Ok(())
}

fn run_batch(
    manifest: &Path,
    options: &Options,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let jobs: Vec<RecordingJob> = serde_json::from_str(&fs::read_to_string(manifest)?)
        .map_err(|e| format!("Invalid manifest {}: {e}", manifest.display()))?;
    log::info!("Scoring {} recordings", jobs.len());

    let use_case = build_use_case(options)?;
    let executor = match options.workers {
        Some(n) => ThreadedBatchExecutor::new(n),
        None => ThreadedBatchExecutor::default(),
    };

    let progress: BatchProgressFn = &|completed, total| {
        eprint!("\rScored {completed}/{total}");
    };
    let outcomes = executor.execute(&use_case, &jobs, Some(progress));
    eprintln!();

    let scored: Vec<ScoringResult> = outcomes.iter().filter_map(|o| o.clone().ok()).collect();
    let summary = SessionSummary::from_results(&scored);

    if json {
        let entries: Vec<serde_json::Value> = jobs
            .iter()
            .zip(&outcomes)
            .map(|(job, outcome)| batch_entry_json(job, outcome))
            .collect();
        let report = serde_json::json!({ "results": entries, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (job, outcome) in jobs.iter().zip(&outcomes) {
            match outcome {
                Ok(result) => println!(
                    "{:6.1}  {:<6}  {}",
                    result.overall_score(),
                    result.overall_band(),
                    job.audio.display()
                ),
                Err(e) => println!("{:>6}  {:<6}  {}: {e}", "-", "failed", job.audio.display()),
            }
        }
        println!();
        println!(
            "{} of {} recordings scored, average {:.1} ({}), {} mastered",
            summary.attempts,
            jobs.len(),
            summary.average_score,
            summary.band.feedback(),
            summary.mastered
        );
    }
    Ok(())
}

fn batch_entry_json(job: &RecordingJob, outcome: &JobOutcome) -> serde_json::Value {
    match outcome {
        Ok(result) => serde_json::json!({ "audio": job.audio, "result": result }),
        Err(e) => serde_json::json!({ "audio": job.audio, "error": e.to_string() }),
    }
}

fn build_use_case(
    options: &Options,
) -> Result<ScoreRecordingUseCase, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {WHISPER_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        WHISPER_MODEL_NAME,
        WHISPER_MODEL_URL,
        options.model.as_deref(),
        Some(Box::new(download_progress)),
    )?;

    let mut config = WhisperConfig::default();
    if let Some(language) = &options.language {
        let language = (language != "auto").then(|| language.clone());
        config = config.with_language(language);
    }
    if let Some(threads) = options.threads {
        config = config.with_threads(threads);
    }

    let recognizer = WhisperRecognizer::new(&model_path, config)?;
    Ok(ScoreRecordingUseCase::new(
        Box::new(FfmpegAudioReader),
        Box::new(recognizer),
        options.scorer(),
    ))
}

fn load_catalog(options: &Options) -> Result<PhraseCatalog, Box<dyn std::error::Error>> {
    match &options.phrases_file {
        Some(path) => Ok(json_phrase_loader::load_catalog(path)?),
        None => Ok(PhraseCatalog::builtin()),
    }
}

fn print_result(result: &ScoringResult, json: bool) {
    if json {
        println!("{}", result.to_json_pretty());
        return;
    }

    println!("Expected: {}", result.original_text());
    println!("Heard:    {}", result.transcribed_text());
    println!();
    for ws in result.word_scores() {
        println!("  {:<6}  {:5.1}  {}", ws.band(), ws.score(), ws.word());
    }
    println!();
    let band = result.overall_band();
    println!(
        "Overall: {:.1} ({band}) {}",
        result.overall_score(),
        band.feedback()
    );
}

fn validate(cli: &Cli, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&options.position_discount) {
        return Err(format!(
            "Position discount must be between 0.0 and 1.0, got {}",
            options.position_discount
        )
        .into());
    }
    if options.threads == Some(0) {
        return Err("Threads must be at least 1".into());
    }
    if options.workers == Some(0) {
        return Err("Workers must be at least 1".into());
    }
    if let Some(model) = &options.model {
        if !model.is_file() {
            return Err(format!("Model file not found: {}", model.display()).into());
        }
    }
    match &cli.command {
        Command::Score { audio, .. } if !audio.exists() => {
            Err(format!("Audio file not found: {}", audio.display()).into())
        }
        Command::Batch { manifest, .. } if !manifest.exists() => {
            Err(format!("Manifest not found: {}", manifest.display()).into())
        }
        _ => Ok(()),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("enlearn").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&["--position-discount", "0.5", "batch", "jobs.json", "--workers", "2"]);
        let settings = Settings {
            position_discount: Some(0.9),
            workers: Some(8),
            language: Some("en".to_string()),
            ..Settings::default()
        };
        let options = Options::merge(&cli, settings);
        assert_eq!(options.position_discount, 0.5);
        assert_eq!(options.workers, Some(2));
        assert_eq!(options.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_default_discount_without_flag_or_setting() {
        let cli = parse(&["compare", "--original", "a", "--transcript", "a"]);
        let options = Options::merge(&cli, Settings::default());
        assert_eq!(options.position_discount, DEFAULT_POSITION_DISCOUNT);
        assert!(validate(&cli, &options).is_ok());
    }

    #[test]
    fn test_validate_rejects_discount_out_of_range() {
        let cli = parse(&[
            "--position-discount",
            "1.5",
            "compare",
            "--original",
            "a",
            "--transcript",
            "a",
        ]);
        let options = Options::merge(&cli, Settings::default());
        let err = validate(&cli, &options).unwrap_err().to_string();
        assert!(err.contains("Position discount"));
    }

    #[test]
    fn test_validate_rejects_missing_audio() {
        let cli = parse(&["score", "/nonexistent/take.wav", "--phrase", "Hello"]);
        let options = Options::merge(&cli, Settings::default());
        assert!(validate(&cli, &options).is_err());
    }

    #[test]
    fn test_score_requires_a_phrase() {
        let args = ["enlearn", "score", "take.wav"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_phrase_and_phrase_id_conflict() {
        let args = ["enlearn", "score", "take.wav", "--phrase", "Hi", "--phrase-id", "1"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_level_parses() {
        let cli = parse(&["phrases", "--level", "advanced"]);
        assert!(matches!(
            cli.command,
            Command::Phrases {
                level: Some(Difficulty::Advanced),
                ..
            }
        ));
    }
}
