use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::{self, FileManager};
use crate::formats;
use crate::transcript::{SubtitleFormat, Transcript};
use crate::translation::{translate_range, LlmTranslator, TranslationParams, Translator};
use crate::transport::RawCapture;

// @module: Application controller for one translation run

/// Options that vary per invocation rather than per configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip every transport call and emit a pass-through copy
    pub no_llm: bool,

    /// Persist all raw LLM traffic next to the output file
    pub capture_raw: bool,

    /// Output format override; defaults to the input format
    pub output_format: Option<SubtitleFormat>,
}

/// Outcome of one run, for caller-side reporting
#[derive(Debug)]
pub struct RunReport {
    /// Where the output file was written
    pub output_path: PathBuf,

    /// Ids that could not be translated; their cues carry the source text
    pub unresolved: Vec<String>,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full workflow for one input subtitle file.
    ///
    /// Parses the input, chunks it, translates chunk by chunk (unless
    /// `no_llm`), renders the requested output format with a provenance note
    /// and writes it to the templated output path.
    pub async fn run(&self, input_file: &Path, options: &RunOptions) -> Result<RunReport> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let input_format = SubtitleFormat::from_path(input_file)?;
        let content = FileManager::read_to_string(input_file)?;
        let mut transcript = formats::parse_as(&content, input_format)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", input_file))?;

        info!(
            "Parsed {} cue(s) from {:?} ({} format)",
            transcript.cues.len(), input_file, input_format
        );

        let chunks = transcript.split_into_chunks(self.config.max_chars_per_request);

        let raw_capture = options.capture_raw.then(RawCapture::new);
        let params = TranslationParams::from_config(&self.config, raw_capture.clone());
        let translator = LlmTranslator::new();

        let unresolved = self
            .translate_with_progress(&translator, &mut transcript, &chunks, &params, options.no_llm)
            .await?;

        if !unresolved.is_empty() {
            warn!(
                "{} cue(s) kept their source text after retry: {:?}",
                unresolved.len(), unresolved
            );
        }

        let output_format = options.output_format.unwrap_or(input_format);
        let note = if options.no_llm {
            None
        } else {
            Some(format!(
                "translated-with model={} time={}",
                self.config.model,
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S")
            ))
        };
        let rendered = formats::build_output_as(&transcript, output_format, note.as_deref());

        let output_path = file_utils::resolve_outfile(
            &self.config.output_template,
            input_file,
            &self.config.source_language,
            &self.config.target_language,
            output_format.extension(),
            Some(&self.config.model),
        )?;
        FileManager::write_to_file(&output_path, &rendered)?;
        info!("Wrote output to {:?}", output_path);

        if let Some(capture) = raw_capture {
            let raw_path = output_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("llm_raw.txt");
            FileManager::write_to_file(&raw_path, &capture.dump())?;
            info!("Wrote raw LLM traffic to {:?}", raw_path);
        }

        Ok(RunReport { output_path, unresolved })
    }

    async fn translate_with_progress(
        &self,
        translator: &dyn Translator,
        transcript: &mut Transcript,
        chunks: &[crate::transcript::Chunk],
        params: &TranslationParams,
        no_llm: bool,
    ) -> Result<Vec<String>> {
        let progress_bar = ProgressBar::new(chunks.len() as u64);
        progress_bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} chunks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress_bar.set_message(if no_llm { "Copying" } else { "Translating" });

        let bar = progress_bar.clone();
        let unresolved = translate_range(translator, transcript, chunks, params, no_llm, move |done, _total| {
            bar.set_position(done as u64);
        })
        .await?;

        progress_bar.finish_and_clear();
        Ok(unresolved)
    }
}
