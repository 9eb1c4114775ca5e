//! Mimic — Markov text generation that imitates a training corpus.
//!
//! Normalizes a corpus into word tokens, learns a variable-order transition
//! model from it, and walks that model to produce new word sequences. The
//! surrounding modules build completion-API payloads from the output and
//! score it for similarity to the source and for sentiment.

pub mod analysis;
pub mod completion;
pub mod config;
pub mod core;
