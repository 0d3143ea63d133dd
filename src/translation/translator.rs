/*!
 * The `Translator` capability and its LLM-backed implementation.
 *
 * Batch and single-item translation are two operations of one capability
 * behind a shared trait, so the orchestrator can be exercised with
 * substitutable fakes and no network access.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::app_config::LlmMode;
use crate::errors::ProviderError;
use crate::transport::LlmClient;

use super::prompts;
use super::TranslationParams;

/// Common interface for batch and single-item translation
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate an ordered list of `(id, source_text)` pairs with one call.
    ///
    /// The returned list may be shorter than the input when the backend drops
    /// items; detecting and remediating that is the caller's responsibility.
    async fn translate_batch(
        &self,
        items: &[(String, String)],
        params: &TranslationParams,
    ) -> Result<Vec<(String, String)>, ProviderError>;

    /// Translate one source text with one call
    async fn translate_single(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<String, ProviderError>;
}

/// Translator backed by an LLM HTTP endpoint
#[derive(Debug, Clone, Default)]
pub struct LlmTranslator {
    client: LlmClient,
}

impl LlmTranslator {
    /// Create a new LLM translator
    pub fn new() -> Self {
        LlmTranslator { client: LlmClient::new() }
    }

    fn endpoint(params: &TranslationParams) -> String {
        let base = params.server.trim_end_matches('/');
        match params.llm_mode {
            LlmMode::Generate => format!("{}/api/generate", base),
            // Auto resolves to the chat protocol
            LlmMode::Auto | LlmMode::Chat => format!("{}/api/chat", base),
        }
    }

    fn payload(prompt: &str, params: &TranslationParams) -> Value {
        match params.llm_mode {
            LlmMode::Generate => json!({
                "model": params.model,
                "prompt": prompt,
                "stream": params.stream,
            }),
            LlmMode::Auto | LlmMode::Chat => json!({
                "model": params.model,
                "messages": [{"role": "user", "content": prompt}],
                "stream": params.stream,
            }),
        }
    }

    async fn call(&self, prompt: &str, params: &TranslationParams) -> Result<String, ProviderError> {
        let url = Self::endpoint(params);
        let payload = Self::payload(prompt, params);
        self.client
            .call(
                &url,
                &payload,
                Duration::from_secs(params.timeout_secs),
                params.stream,
                params.raw_capture.as_ref(),
            )
            .await
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate_batch(
        &self,
        items: &[(String, String)],
        params: &TranslationParams,
    ) -> Result<Vec<(String, String)>, ProviderError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::build_batch_prompt(
            items,
            &params.source_language,
            &params.target_language,
            params.translate_bracketed,
        );

        let response = self.call(&prompt, params).await?;

        let ids: Vec<String> = items.iter().map(|(id, _)| id.clone()).collect();
        let pairs = prompts::parse_batch_response(&response, &ids);
        debug!("Batch of {} items returned {} parsed entries", items.len(), pairs.len());

        Ok(pairs)
    }

    async fn translate_single(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<String, ProviderError> {
        let prompt = prompts::build_single_prompt(
            text,
            &params.source_language,
            &params.target_language,
            params.translate_bracketed,
        );
        self.call(&prompt, params).await
    }
}
