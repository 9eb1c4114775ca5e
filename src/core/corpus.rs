//! Corpus loading and normalization into word tokens.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("could not read corpus '{path}': {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported corpus format: {0} (only plain text is accepted)")]
    UnsupportedFormat(PathBuf),
}

/// Characters replaced by a single space before splitting.
const SPACED_PUNCTUATION: &[char] = &['!', '.', ',', '@', '&', '?', '-'];
/// Characters deleted outright.
const STRIPPED_PUNCTUATION: &[char] = &['"', '(', ')'];

/// Read a corpus file as text.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so any
/// readable file produces a string. PDFs are refused: conversion to text is
/// expected to happen upstream.
pub fn load_corpus_text(path: &Path) -> Result<String, CorpusError> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        return Err(CorpusError::UnsupportedFormat(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| CorpusError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Normalize raw text into an ordered sequence of word tokens.
///
/// Lowercases, turns `! . , @ & ? -` into spaces, deletes `" ( )`, then
/// splits on whitespace. Never fails.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if SPACED_PUNCTUATION.contains(&c) {
            cleaned.push(' ');
        } else if !STRIPPED_PUNCTUATION.contains(&c) {
            cleaned.push(c);
        }
    }
    cleaned.split_whitespace().map(str::to_owned).collect()
}
