//! Lexicon-based sentiment scoring, averaged sentence by sentence.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

const SENTENCE_ENDERS: &[char] = &['.', '!', '?'];
/// Words that flip and soften the polarity of the word right after them.
const NEGATIONS: &[&str] = &["not", "never"];
const NEGATION_FACTOR: f32 = -0.5;

/// Polarity (-1.0..=1.0) and subjectivity (0.0..=1.0) of a word or text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub polarity: f32,
    pub subjectivity: f32,
}

/// Word → score table, stored on disk as a RON map:
///
/// ```ron
/// {
///     "good": (polarity: 0.7, subjectivity: 0.6),
///     "terrible": (polarity: -1.0, subjectivity: 1.0),
/// }
/// ```
///
/// Words are matched in lowercase, so keys are lowercased on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "LexiconFile", into = "LexiconFile")]
pub struct Lexicon {
    words: FxHashMap<String, SentimentScore>,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct LexiconFile(FxHashMap<String, SentimentScore>);

impl From<LexiconFile> for Lexicon {
    fn from(file: LexiconFile) -> Self {
        let words = file
            .0
            .into_iter()
            .map(|(word, score)| (word.to_lowercase(), score))
            .collect();
        Self { words }
    }
}

impl From<Lexicon> for LexiconFile {
    fn from(lexicon: Lexicon) -> Self {
        Self(lexicon.words)
    }
}

impl Lexicon {
    pub fn load_from_ron(path: &Path) -> Result<Self, SentimentError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Build a lexicon from `(word, polarity, subjectivity)` triples.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, f32, f32)>) -> Self {
        let words = entries
            .into_iter()
            .map(|(word, polarity, subjectivity)| {
                (
                    word.to_lowercase(),
                    SentimentScore {
                        polarity,
                        subjectivity,
                    },
                )
            })
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<SentimentScore> {
        self.words.get(word).copied()
    }

    /// Mean score over the words of `sentence` found in the lexicon.
    ///
    /// A hit directly after a negation has its polarity multiplied by -0.5.
    /// A sentence without hits is neutral and objective.
    pub fn score_sentence(&self, sentence: &str) -> SentimentScore {
        let mut total = SentimentScore::default();
        let mut hits = 0usize;
        let mut negated = false;

        for raw in sentence.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if let Some(score) = self.get(&word) {
                let polarity = if negated {
                    score.polarity * NEGATION_FACTOR
                } else {
                    score.polarity
                };
                total.polarity += polarity;
                total.subjectivity += score.subjectivity;
                hits += 1;
            }
            negated = NEGATIONS.contains(&word.as_str());
        }

        if hits == 0 {
            return SentimentScore::default();
        }
        SentimentScore {
            polarity: (total.polarity / hits as f32).clamp(-1.0, 1.0),
            subjectivity: (total.subjectivity / hits as f32).clamp(0.0, 1.0),
        }
    }
}

/// Average sentiment over the sentences of `text`.
///
/// Sentences end at `.`, `!` or `?`. Text without any sentence scores zero.
pub fn analyze_by_sentence(text: &str, lexicon: &Lexicon) -> SentimentScore {
    let mut total = SentimentScore::default();
    let mut count = 0usize;

    for sentence in text
        .split(SENTENCE_ENDERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let score = lexicon.score_sentence(sentence);
        total.polarity += score.polarity;
        total.subjectivity += score.subjectivity;
        count += 1;
    }

    if count == 0 {
        return SentimentScore::default();
    }
    SentimentScore {
        polarity: total.polarity / count as f32,
        subjectivity: total.subjectivity / count as f32,
    }
}

/// Describe a polarity score in words.
pub fn interpret_polarity(polarity: f32) -> &'static str {
    if polarity > 0.5 {
        "positive"
    } else if polarity > 0.0 {
        "somewhat positive"
    } else if (-0.5..0.0).contains(&polarity) {
        "somewhat negative"
    } else if polarity < -0.5 {
        "negative"
    } else {
        "emotionally neutral"
    }
}

/// Describe a subjectivity score in words.
pub fn interpret_subjectivity(subjectivity: f32) -> &'static str {
    if subjectivity > 0.7 {
        "subjective"
    } else if subjectivity > 0.5 {
        "somewhat subjective"
    } else if subjectivity > 0.3 {
        "has balanced subjectivity"
    } else if subjectivity > 0.0 {
        "somewhat objective"
    } else {
        "objective"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::from_entries([
            ("good", 0.7, 0.6),
            ("great", 0.8, 0.75),
            ("terrible", -1.0, 1.0),
            ("dark", -0.15, 0.4),
        ])
    }

    #[test]
    fn polarity_bands() {
        assert_eq!(interpret_polarity(0.9), "positive");
        assert_eq!(interpret_polarity(0.5), "somewhat positive");
        assert_eq!(interpret_polarity(0.01), "somewhat positive");
        assert_eq!(interpret_polarity(0.0), "emotionally neutral");
        assert_eq!(interpret_polarity(-0.2), "somewhat negative");
        assert_eq!(interpret_polarity(-0.5), "somewhat negative");
        assert_eq!(interpret_polarity(-0.51), "negative");
    }

    #[test]
    fn subjectivity_bands() {
        assert_eq!(interpret_subjectivity(0.9), "subjective");
        assert_eq!(interpret_subjectivity(0.7), "somewhat subjective");
        assert_eq!(interpret_subjectivity(0.5), "has balanced subjectivity");
        assert_eq!(interpret_subjectivity(0.3), "somewhat objective");
        assert_eq!(interpret_subjectivity(0.0), "objective");
    }

    #[test]
    fn sentence_score_averages_hits() {
        let score = lexicon().score_sentence("A good and great day.");
        assert!((score.polarity - 0.75).abs() < 1e-6);
        assert!((score.subjectivity - 0.675).abs() < 1e-6);
    }

    #[test]
    fn negation_flips_and_softens() {
        let score = lexicon().score_sentence("It was not good");
        assert!((score.polarity - -0.35).abs() < 1e-6);
        assert!((score.subjectivity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn sentence_without_hits_is_neutral() {
        assert_eq!(
            lexicon().score_sentence("the cat sat"),
            SentimentScore::default()
        );
    }

    #[test]
    fn text_is_averaged_by_sentence() {
        let score = analyze_by_sentence("Good! The cat sat. Terrible?", &lexicon());
        // (0.7 + 0.0 - 1.0) / 3
        assert!((score.polarity - -0.1).abs() < 1e-6);
        assert!((score.subjectivity - (1.6 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(analyze_by_sentence("", &lexicon()), SentimentScore::default());
        assert_eq!(analyze_by_sentence(" ... ", &lexicon()), SentimentScore::default());
    }

    #[test]
    fn lexicon_loads_from_ron() {
        let lexicon: Lexicon =
            ron::from_str(r#"{"good": (polarity: 0.7, subjectivity: 0.6)}"#).unwrap();
        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.get("good").unwrap().polarity, 0.7);
    }

    #[test]
    fn capitalized_ron_keys_still_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.ron");
        std::fs::write(
            &path,
            r#"{"Good": (polarity: 0.7, subjectivity: 0.6), "DARK": (polarity: -0.15, subjectivity: 0.4)}"#,
        )
        .unwrap();

        let lexicon = Lexicon::load_from_ron(&path).unwrap();
        assert!(lexicon.get("Good").is_none());
        assert_eq!(lexicon.get("dark").unwrap().polarity, -0.15);

        let score = lexicon.score_sentence("A good morning.");
        assert!((score.polarity - 0.7).abs() < 1e-6);
    }
}
