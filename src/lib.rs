/*!
 * # subsetzer
 *
 * A Rust library for batch translation of subtitle files using an LLM endpoint.
 *
 * ## Features
 *
 * - Parse and write SRT, WebVTT and TSV subtitle files
 * - Partition transcripts into size-bounded translation requests
 * - Batched multi-cue translation with a delimited prompt protocol
 * - Single-cue retry fallback for dropped or degenerate translations
 * - Streaming or buffered consumption of LLM responses
 * - Raw-traffic capture for diagnostics
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Cue/Transcript/Chunk data model and chunking
 * - `formats`: Subtitle format parsers and writers
 * - `transport`: HTTP/JSON transport with streaming decode
 * - `translation`: Translation orchestration:
 *   - `translation::prompts`: the delimited batch protocol
 *   - `translation::translator`: the `Translator` capability
 *   - `translation::engine`: apply/validate/retry and the range driver
 * - `file_utils`: File system operations and output-path templating
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod transcript;
pub mod translation;
pub mod transport;

// Re-export main types for easier usage
pub use app_config::{Config, LlmMode};
pub use app_controller::{Controller, RunOptions, RunReport};
pub use errors::{AppError, ProviderError, TranscriptError};
pub use transcript::{Chunk, Cue, SubtitleFormat, Transcript};
pub use translation::{LlmTranslator, TranslationParams, Translator};
pub use transport::{LlmClient, RawCapture};
