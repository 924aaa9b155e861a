//! Mock external-service backends for deterministic testing.
//!
//! Provides mock implementations of the completion and text-extraction
//! boundaries that return scripted responses and record every call, so
//! pipeline tests can assert on call order and timing without touching any
//! network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use docguard_core::{
    CompletionBackend, CompletionOptions, Error, Result, TextExtraction, TextExtractionBackend,
};

/// One recorded completion call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct MockState {
    default_response: String,
    /// Prompt-substring → scripted response.
    responses: HashMap<String, String>,
    /// Prompt substrings that trigger a scripted failure.
    failures: Vec<String>,
    calls: Vec<MockCall>,
}

/// Mock completion backend with scripted responses and a call log.
#[derive(Clone)]
pub struct MockCompletionBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockCompletionBackend {
    /// Create a mock with an empty default response.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the default response for all prompts.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.state.lock().unwrap().default_response = response.into();
        self
    }

    /// Script a response for prompts containing the given substring.
    pub fn with_response_for(
        self,
        prompt_contains: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(prompt_contains.into(), response.into());
        self
    }

    /// Script a failure for prompts containing the given substring.
    pub fn with_failure_for(self, prompt_contains: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .push(prompt_contains.into());
        self
    }

    /// All recorded calls, in dispatch order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

impl Default for MockCompletionBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletionBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        _opts: &CompletionOptions,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            at: Instant::now(),
        });

        if state.failures.iter().any(|f| prompt.contains(f.as_str())) {
            return Err(Error::Completion("scripted mock failure".to_string()));
        }

        for (needle, response) in &state.responses {
            if prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }

        Ok(state.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Mock text-extraction backend.
pub struct MockOcrBackend {
    text: String,
    confidence: f32,
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockOcrBackend {
    /// Create a mock that extracts the given text at full confidence.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails with an extraction error.
    pub fn failing() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            fail: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the reported confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Image paths this mock was asked to extract.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractionBackend for MockOcrBackend {
    async fn extract_text(&self, image_path: &str) -> Result<TextExtraction> {
        self.calls.lock().unwrap().push(image_path.to_string());

        if self.fail {
            return Err(Error::Extraction("scripted OCR failure".to_string()));
        }

        Ok(TextExtraction {
            full_text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_completion_default_and_mapped_responses() {
        let backend = MockCompletionBackend::new()
            .with_response("default")
            .with_response_for("electric", "{\"title\": \"Electric Bill\"}");

        let opts = CompletionOptions::default();
        assert_eq!(backend.complete("s", "anything", &opts).await.unwrap(), "default");
        assert_eq!(
            backend.complete("s", "the electric bill", &opts).await.unwrap(),
            "{\"title\": \"Electric Bill\"}"
        );
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_completion_scripted_failure() {
        let backend = MockCompletionBackend::new().with_failure_for("bad");
        let err = backend
            .complete("s", "a bad prompt", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Completion(_)));
    }

    #[tokio::test]
    async fn mock_ocr_returns_text_and_records_calls() {
        let ocr = MockOcrBackend::new("Electric Bill $120.50").with_confidence(0.92);
        let extraction = ocr.extract_text("/tmp/scan.jpg").await.unwrap();
        assert_eq!(extraction.full_text, "Electric Bill $120.50");
        assert!((extraction.confidence - 0.92).abs() < f32::EPSILON);
        assert_eq!(ocr.calls(), vec!["/tmp/scan.jpg"]);
    }

    #[tokio::test]
    async fn mock_ocr_failing_surfaces_extraction_error() {
        let ocr = MockOcrBackend::failing();
        let err = ocr.extract_text("/tmp/scan.jpg").await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
