/*!
 * Mock translator implementations for testing
 *
 * This module provides a scriptable implementation of the Translator trait
 * so the orchestrator can be exercised without any network access. Batch and
 * single responses are queued up front; a call tracker records what the
 * code under test actually asked for.
 */

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use subsetzer::errors::ProviderError;
use subsetzer::translation::{TranslationParams, Translator};

/// Tracks calls made against the mock to assert on interaction shape
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Number of batch calls made
    pub batch_calls: usize,
    /// Number of single-item calls made
    pub single_calls: usize,
    /// Source texts passed to single-item calls, in order
    pub single_texts: Vec<String>,
    /// Should the next call fail with a transport error
    pub should_fail: bool,
}

/// Scriptable mock implementation of the Translator trait
#[derive(Debug, Default)]
pub struct MockTranslator {
    batch_responses: Mutex<VecDeque<Vec<(String, String)>>>,
    single_responses: Mutex<VecDeque<String>>,
    tracker: Arc<Mutex<CallTracker>>,
}

impl MockTranslator {
    /// Create a new mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one batch response (consumed in FIFO order)
    pub fn push_batch(self, response: Vec<(&str, &str)>) -> Self {
        self.batch_responses.lock().unwrap().push_back(
            response.into_iter().map(|(id, text)| (id.to_string(), text.to_string())).collect(),
        );
        self
    }

    /// Queue one single-item response (consumed in FIFO order)
    pub fn push_single(self, response: &str) -> Self {
        self.single_responses.lock().unwrap().push_back(response.to_string());
        self
    }

    /// Configure the mock to fail the next call with a transport error
    pub fn fail_next_call(&self) {
        self.tracker.lock().unwrap().should_fail = true;
    }

    /// Get the call tracker
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        let mut tracker = self.tracker.lock().unwrap();
        if tracker.should_fail {
            tracker.should_fail = false;
            return Err(ProviderError::ConnectionError("mock connection failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate_batch(
        &self,
        items: &[(String, String)],
        _params: &TranslationParams,
    ) -> Result<Vec<(String, String)>, ProviderError> {
        self.check_failure()?;
        self.tracker.lock().unwrap().batch_calls += 1;

        if let Some(scripted) = self.batch_responses.lock().unwrap().pop_front() {
            return Ok(scripted);
        }

        // Unscripted default: translate everything with a visible marker
        Ok(items
            .iter()
            .map(|(id, text)| (id.clone(), format!("{} (translated)", text)))
            .collect())
    }

    async fn translate_single(
        &self,
        text: &str,
        _params: &TranslationParams,
    ) -> Result<String, ProviderError> {
        self.check_failure()?;
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.single_calls += 1;
            tracker.single_texts.push(text.to_string());
        }

        if let Some(scripted) = self.single_responses.lock().unwrap().pop_front() {
            return Ok(scripted);
        }
        Ok(format!("{} (translated)", text))
    }
}
