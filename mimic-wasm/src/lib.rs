//! WASM bindings for mimic — powers the in-browser playground.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use mimic::analysis::similarity::check_similarity;
use mimic::core::corpus;
use mimic::core::markov::{MarkovTrainer, Recovery, TransitionModel};
use mimic::core::pipeline::{generate_from_model, join};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct GenerationOutput<'a> {
    words: &'a [String],
    text: String,
    recoveries: &'a [Recovery],
}

#[derive(serde::Serialize)]
struct ModelInfo {
    order: usize,
    tokens: usize,
    keys: usize,
    transitions: usize,
}

/// Walk `model` and render the result as `{ words, text, recoveries }`.
/// An empty `seed_words` gives a random start.
fn generation_json(
    model: &TransitionModel,
    length: usize,
    seed_words: &str,
    rng_seed: u64,
) -> Result<String, serde_json::Error> {
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let generation = generate_from_model(model, length, Some(seed_words), &mut rng);
    serde_json::to_string(&GenerationOutput {
        words: &generation.words,
        text: join(&generation.words),
        recoveries: &generation.recoveries,
    })
}

/// One-shot generation: train an order-`order` model on `corpus_text` and
/// walk it for `length` words. Returns JSON `{ words, text, recoveries }`.
#[wasm_bindgen]
pub fn generate(
    corpus_text: &str,
    order: usize,
    length: usize,
    seed_words: &str,
    rng_seed: u64,
) -> Result<String, JsError> {
    let model = MarkovTrainer::train_text(corpus_text, order)
        .map_err(|e| JsError::new(&format!("Training error: {e}")))?;
    generation_json(&model, length, seed_words, rng_seed)
        .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// MimicDemo — trains once, then generates and scores repeatedly
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct MimicDemo {
    corpus_text: String,
    token_count: usize,
    model: TransitionModel,
}

#[wasm_bindgen]
impl MimicDemo {
    /// Train a model of the given order from pasted corpus text.
    #[wasm_bindgen(constructor)]
    pub fn new(corpus_text: &str, order: usize) -> Result<MimicDemo, JsError> {
        let tokens = corpus::normalize(corpus_text);
        let model = MarkovTrainer::train(&tokens, order)
            .map_err(|e| JsError::new(&format!("Training error: {e}")))?;

        Ok(MimicDemo {
            corpus_text: corpus_text.to_string(),
            token_count: tokens.len(),
            model,
        })
    }

    /// Generate `length` words. Returns JSON `{ words, text, recoveries }`.
    ///
    /// `seed_words` may be empty for a random start.
    pub fn generate(
        &self,
        length: usize,
        seed_words: &str,
        rng_seed: u64,
    ) -> Result<String, JsError> {
        generation_json(&self.model, length, seed_words, rng_seed)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Compare generated text against the training corpus. Returns JSON.
    pub fn similarity(&self, output: &str, window: usize, threshold: f32) -> Result<String, JsError> {
        let report = check_similarity(&self.corpus_text, output, window, threshold);
        serde_json::to_string(&report)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON summary of the trained model.
    pub fn model_info(&self) -> Result<String, JsError> {
        let info = ModelInfo {
            order: self.model.order(),
            tokens: self.token_count,
            keys: self.model.len(),
            transitions: self.model.transition_count(),
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }
}
