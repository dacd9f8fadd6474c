// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::captions::render_captions;
use crate::correction::apply_suggestions;
use crate::file_utils::FileManager;
use crate::timecode::SubtitleFormat;

mod app_config;
mod app_controller;
mod captions;
mod correction;
mod errors;
mod file_utils;
mod language_utils;
mod segmenter;
mod timecode;
mod transcript;

/// CLI wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleFormat {
    Srt,
    Vtt,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
            CliSubtitleFormat::Vtt => SubtitleFormat::Vtt,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an uploaded caption or transcript file into a subtitle file
    Process {
        /// Input file (.srt, .vtt or .txt)
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Output subtitle format
        #[arg(short, long, value_enum)]
        format: Option<CliSubtitleFormat>,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the plain transcript text instead of a subtitle file
        #[arg(long)]
        text_only: bool,
    },

    /// Fetch a hosted video's transcript and emit a subtitle file
    Fetch {
        /// Video URL or bare video id
        #[arg(value_name = "VIDEO")]
        video: String,

        /// Raw transcript file used as fallback when no captions are found
        #[arg(short = 'r', long)]
        transcript: Option<PathBuf>,

        /// Output subtitle format
        #[arg(short, long, value_enum)]
        format: Option<CliSubtitleFormat>,

        /// Target language code (e.g., 'en', 'es', 'ar')
        #[arg(short = 'l', long)]
        target_language: Option<String>,

        /// Output file path (defaults to the generated filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Proofread a transcript and print edit suggestions
    Suggest {
        /// Input text file
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Print the corrected text instead of the suggestion list
        #[arg(long)]
        apply: bool,
    },

    /// Generate shell completions for yascap
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// YASCap - Yet Another Subtitle Captioner
///
/// Turns uploaded captions, raw transcripts or hosted-video caption
/// tracks into timed SRT/VTT subtitle files, with rule-based
/// proofreading suggestions.
#[derive(Parser, Debug)]
#[command(name = "yascap")]
#[command(author = "YASCap Team")]
#[command(version = "1.0.0")]
#[command(about = "Caption acquisition and normalization tool")]
#[command(long_about = "YASCap turns transcripts into timed subtitle files.

EXAMPLES:
    yascap process talk.srt -f vtt              # Convert SRT to VTT
    yascap process notes.txt -o talk.srt        # Segment plain text into cues
    yascap fetch https://youtu.be/dQw4w9WgXcQ   # Fetch captions for a video
    yascap fetch dQw4w9WgXcQ -r raw.txt         # Fall back to a raw transcript
    yascap suggest transcript.txt               # Print proofreading suggestions
    yascap suggest transcript.txt --apply       # Print the corrected text
    yascap completions bash > yascap.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, defaults are used.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // raised or lowered after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "yascap", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Process {
            input,
            format,
            output,
            text_only,
        } => {
            if let Some(format) = format {
                config.output_format = format.into();
            }
            run_process(config, &input, output.as_deref(), text_only)
        }
        Commands::Fetch {
            video,
            transcript,
            format,
            target_language,
            output,
        } => {
            if let Some(format) = format {
                config.output_format = format.into();
            }
            if let Some(language) = target_language {
                config.target_language = language;
            }
            run_fetch(config, &video, transcript.as_deref(), output.as_deref()).await
        }
        Commands::Suggest { input, apply } => run_suggest(config, &input, apply),
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }
}

fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::from_file(config_path);
    }

    // Fall back to the platform config directory before giving up
    let fallback = Config::default_path();
    if fallback.exists() {
        return Config::from_file(&fallback);
    }

    warn!("Config file not found at '{}', using defaults.", config_path);
    Ok(Config::default())
}

fn run_process(
    config: Config,
    input: &Path,
    output: Option<&Path>,
    text_only: bool,
) -> Result<()> {
    if !FileManager::file_exists(input) {
        return Err(anyhow!("Input file does not exist: {:?}", input));
    }
    if FileManager::file_size(input)? > config.max_upload_bytes {
        return Err(anyhow!(
            "Input file exceeds the {} byte limit",
            config.max_upload_bytes
        ));
    }

    let format = config.output_format;
    let controller = Controller::with_config(config)?;
    let content = FileManager::read_to_string(input)?;
    let filename = FileManager::file_name_of(input);

    let document = controller
        .process_subtitle_input(&filename, &content)
        .map_err(|e| anyhow!(e.to_string()))?;
    info!("Parsed {} cues from {:?}", document.cues.len(), input);

    let rendered = if text_only {
        document.text
    } else {
        render_captions(&document.cues, format)
    };

    emit(output, &rendered)
}

async fn run_fetch(
    config: Config,
    video: &str,
    transcript: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let fallback = match transcript {
        Some(path) => Some(FileManager::read_to_string(path)?),
        None => None,
    };

    let controller = Controller::with_config(config)?;
    let result = controller
        .generate_subtitles(video, fallback.as_deref())
        .await
        .map_err(|e| anyhow!(e.to_string()))?;

    let target: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&result.filename));
    FileManager::write_to_file(&target, &result.content)?;
    info!("Wrote subtitle file to {:?}", target);
    Ok(())
}

fn run_suggest(config: Config, input: &Path, apply: bool) -> Result<()> {
    let controller = Controller::with_config(config)?;
    let text = FileManager::read_to_string(input)?;

    let suggestions = controller
        .proofread(&text)
        .map_err(|e| anyhow!(e.to_string()))?;
    info!("Found {} suggestions", suggestions.len());

    if apply {
        print!("{}", apply_suggestions(&text, &suggestions));
    } else {
        let json = serde_json::to_string_pretty(&suggestions)
            .context("Failed to serialize suggestions")?;
        println!("{}", json);
    }
    Ok(())
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            FileManager::write_to_file(path, content)?;
            info!("Wrote output to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}
