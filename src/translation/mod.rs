/*!
 * Translation orchestration.
 *
 * The submodules cover the three layers of one translation pass:
 * - `prompts`: the delimited multi-item request/response protocol
 * - `translator`: the `Translator` capability and its LLM-backed implementation
 * - `engine`: batch application with validation, retry and the range driver
 */

pub mod engine;
pub mod prompts;
pub mod translator;

pub use engine::{apply_batch, is_acceptable, translate_range};
pub use translator::{LlmTranslator, Translator};

use crate::app_config::{Config, LlmMode};
use crate::transport::RawCapture;

/// Parameters threaded through every translation call
#[derive(Debug, Clone)]
pub struct TranslationParams {
    /// Source language tag, passed through to the prompt
    pub source_language: String,

    /// Target language tag
    pub target_language: String,

    /// Model name requested from the server
    pub model: String,

    /// Base URL of the LLM server
    pub server: String,

    /// Backend protocol selection
    pub llm_mode: LlmMode,

    /// Whether to consume responses as a line stream
    pub stream: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether bracketed annotations like [music] should be translated
    pub translate_bracketed: bool,

    /// Optional sink receiving all raw LLM traffic
    pub raw_capture: Option<RawCapture>,
}

impl TranslationParams {
    /// Build parameters from the application configuration
    pub fn from_config(config: &Config, raw_capture: Option<RawCapture>) -> Self {
        TranslationParams {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            model: config.model.clone(),
            server: config.server.clone(),
            llm_mode: config.llm_mode,
            stream: config.stream,
            timeout_secs: config.timeout_secs,
            translate_bracketed: config.translate_bracketed,
            raw_capture,
        }
    }
}
