//! Completion-API payloads for polishing raw Markov output.
//!
//! Only the request body and response parsing live here; sending the request
//! is left to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MimicConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Body of a text-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub n: u32,
}

impl CompletionRequest {
    /// Build a request asking the model to turn `sentence` into one readable
    /// sentence.
    pub fn for_sentence(config: &MimicConfig, sentence: &str) -> Self {
        Self {
            model: config.model.clone(),
            prompt: prompt_for(sentence),
            temperature: config.effective_temperature(),
            max_tokens: config.effective_max_tokens(),
            n: config.num_responses,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, CompletionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn prompt_for(sentence: &str) -> String {
    format!(
        "The following sentence may be missing something: \"{}\". \
         Please make the sentence make more sense. \
         And don't return anything but a single sentence. \
         I only want to see one version of the sentence.",
        sentence
    )
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
}

/// The parts of a completion response we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    pub fn from_json(body: &str) -> Result<Self, CompletionError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Corrected text from the first `n` choices.
    ///
    /// A single response is returned trimmed. Several are each trimmed and
    /// followed by a blank line. Missing choices contribute nothing.
    pub fn corrected_text(&self, n: usize) -> String {
        if n <= 1 {
            return self
                .choices
                .first()
                .map(|c| c.text.trim().to_string())
                .unwrap_or_default();
        }

        let mut out = String::new();
        for choice in self.choices.iter().take(n) {
            out.push_str(choice.text.trim());
            out.push_str("\n\n");
        }
        out
    }
}
