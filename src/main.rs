// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, LlmMode, LogLevel};
use crate::app_controller::{Controller, RunOptions};
use crate::transcript::SubtitleFormat;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod formats;
mod transcript;
mod translation;
mod transport;

/// CLI wrapper for LlmMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLlmMode {
    Auto,
    Chat,
    Generate,
}

impl From<CliLlmMode> for LlmMode {
    fn from(mode: CliLlmMode) -> Self {
        match mode {
            CliLlmMode::Auto => LlmMode::Auto,
            CliLlmMode::Chat => LlmMode::Chat,
            CliLlmMode::Generate => LlmMode::Generate,
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

impl From<CliLogLevel> for LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Vtt,
    Tsv,
}

impl From<CliOutputFormat> for SubtitleFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Srt => SubtitleFormat::Srt,
            CliOutputFormat::Vtt => SubtitleFormat::Vtt,
            CliOutputFormat::Tsv => SubtitleFormat::Tsv,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file using an LLM endpoint (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for subsetzer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input subtitle file to process (.srt, .vtt or .tsv)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output path template ({basename}, {src}, {dst}, {fmt}, {model})
    #[arg(short, long)]
    output: Option<String>,

    /// Source language tag (e.g. 'en', 'English')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language tag (e.g. 'de', 'German')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Model name to use for translation
    #[arg(short, long, env = "SUBSETZER_MODEL")]
    model: Option<String>,

    /// Base URL of the LLM server
    #[arg(long, env = "SUBSETZER_SERVER")]
    server: Option<String>,

    /// Backend protocol to use against the server
    #[arg(long, value_enum)]
    llm_mode: Option<CliLlmMode>,

    /// Consume the response as a line stream
    #[arg(long)]
    stream: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum subtitle characters per batched request
    #[arg(long)]
    batch_chars: Option<usize>,

    /// Output format; defaults to the input format
    #[arg(long, value_enum)]
    to: Option<CliOutputFormat>,

    /// Skip all LLM calls and emit a pass-through copy
    #[arg(long)]
    no_llm: bool,

    /// Write all raw LLM traffic to llm_raw.txt next to the output
    #[arg(long)]
    capture_raw: bool,

    /// Leave bracketed annotations such as [music] untranslated
    #[arg(long)]
    skip_bracketed: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subsetzer - batch subtitle translation over an LLM endpoint
#[derive(Parser, Debug)]
#[command(name = "subsetzer")]
#[command(version = "1.0.0")]
#[command(about = "LLM-powered subtitle translation tool")]
#[command(long_about = "subsetzer reads a subtitle file, translates its cues in size-bounded \
batches against an LLM server and writes the result back in the original or a requested format.

EXAMPLES:
    subsetzer movie.srt                          # Translate using default config
    subsetzer -t German movie.srt                # Pick the target language
    subsetzer -m qwen3:14b --stream movie.srt    # Use a specific model, streamed
    subsetzer --to vtt movie.srt                 # Convert the output format
    subsetzer --no-llm movie.srt                 # Pass-through copy, no LLM calls
    subsetzer --capture-raw movie.srt            # Keep the raw LLM traffic
    subsetzer completions bash > subsetzer.bash  # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    // Top-level copy of the translate arguments so the subcommand can be
    // omitted for the common case
    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: ANSI color for log level
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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
    // Initialize the logger once with info level by default;
    // the level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subsetzer", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        // Default behavior: treat the top-level arguments as a translate run
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(level) = &options.log_level {
        let config_level: LogLevel = level.clone().into();
        log::set_max_level(config_level.into());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(output) = &options.output {
        config.output_template = output.clone();
    }
    if let Some(source) = &options.source_language {
        config.source_language = source.clone();
    }
    if let Some(target) = &options.target_language {
        config.target_language = target.clone();
    }
    if let Some(model) = &options.model {
        config.model = model.clone();
    }
    if let Some(server) = &options.server {
        config.server = server.clone();
    }
    if let Some(mode) = &options.llm_mode {
        config.llm_mode = mode.clone().into();
    }
    if options.stream {
        config.stream = true;
    }
    if let Some(timeout) = options.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(batch_chars) = options.batch_chars {
        config.max_chars_per_request = batch_chars;
    }
    if options.skip_bracketed {
        config.translate_bracketed = false;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.into());

    let run_options = RunOptions {
        no_llm: options.no_llm,
        capture_raw: options.capture_raw,
        output_format: options.to.map(|f| f.into()),
    };

    let input_path = options.input_path.as_ref().ok_or_else(|| {
        anyhow::anyhow!("INPUT_PATH is required")
    })?;

    let controller = Controller::with_config(config)?;
    let report = controller.run(input_path, &run_options).await?;

    if report.unresolved.is_empty() {
        info!("Done: {:?}", report.output_path);
    } else {
        warn!(
            "Done with {} untranslated cue(s): {:?}",
            report.unresolved.len(), report.unresolved
        );
    }

    Ok(())
}
