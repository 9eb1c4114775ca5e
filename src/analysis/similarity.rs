//! Sliding-window similarity between generated output and its source corpus.
//!
//! Each run of `window` output words is compared against every corpus window
//! of the same size that shares at least one word with it. Two windows score
//! `2 * LCS / (len_a + len_b)` over their words, so a verbatim copy scores 1.0.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::core::corpus;

/// Result of comparing output text against a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityReport {
    /// Best score of any output window.
    pub highest: f32,
    /// Mean of the best score of each output window.
    pub average: f32,
    /// `highest` reached the threshold.
    pub too_similar: bool,
    /// Output windows that reached the threshold, in output order.
    pub similar_phrases: Vec<String>,
}

/// Score how closely `output_text` copies `corpus_text`.
///
/// Both texts are normalized like a training corpus first. Output shorter
/// than `window` is scored as a single window; empty output scores zero.
pub fn check_similarity(
    corpus_text: &str,
    output_text: &str,
    window: usize,
    threshold: f32,
) -> SimilarityReport {
    let source = corpus::normalize(corpus_text);
    let output = corpus::normalize(output_text);
    if output.is_empty() || source.is_empty() {
        return SimilarityReport::default();
    }

    let size = window.max(1).min(output.len());
    let index = WindowIndex::new(&source, size);

    let mut report = SimilarityReport::default();
    let mut total = 0.0;
    let mut count = 0usize;

    for chunk in output.windows(size) {
        let score = index.best_score(chunk);
        total += score;
        count += 1;

        if score > report.highest {
            report.highest = score;
        }
        if score >= threshold {
            report.similar_phrases.push(chunk.join(" "));
        }
    }

    report.average = total / count as f32;
    report.too_similar = report.highest >= threshold;
    report
}

/// Corpus windows of a fixed size, looked up through the words they contain.
struct WindowIndex<'a> {
    source: &'a [String],
    size: usize,
    positions: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> WindowIndex<'a> {
    fn new(source: &'a [String], size: usize) -> Self {
        let mut positions: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (pos, word) in source.iter().enumerate() {
            positions.entry(word.as_str()).or_default().push(pos);
        }
        Self {
            source,
            size: size.min(source.len()),
            positions,
        }
    }

    /// Best score of `chunk` against any corpus window sharing a word with it.
    fn best_score(&self, chunk: &[String]) -> f32 {
        let last_start = self.source.len() - self.size;
        let mut starts = FxHashSet::default();

        for word in chunk {
            let Some(hits) = self.positions.get(word.as_str()) else {
                continue;
            };
            for &pos in hits {
                let lo = (pos + 1).saturating_sub(self.size);
                let hi = pos.min(last_start);
                starts.extend(lo..=hi);
            }
        }

        starts
            .into_iter()
            .map(|start| lcs_ratio(chunk, &self.source[start..start + self.size]))
            .fold(0.0, f32::max)
    }
}

/// `2 * LCS / (a.len() + b.len())` over whole words.
fn lcs_ratio(a: &[String], b: &[String]) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    // Single-row dynamic programming table
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    2.0 * row[b.len()] as f32 / (a.len() + b.len()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn lcs_ratio_basics() {
        assert_eq!(lcs_ratio(&words("a b c"), &words("a b c")), 1.0);
        assert_eq!(lcs_ratio(&words("a b c"), &words("x y z")), 0.0);
        assert!((lcs_ratio(&words("a b c d"), &words("a x c d")) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn verbatim_copy_is_flagged() {
        let corpus = "The cat sat on the mat while the dog slept by the door.";
        let report = check_similarity(corpus, "the dog slept by the door", 4, 0.8);
        assert_eq!(report.highest, 1.0);
        assert_eq!(report.average, 1.0);
        assert!(report.too_similar);
        assert_eq!(report.similar_phrases.len(), 3);
        assert_eq!(report.similar_phrases[0], "the dog slept by");
    }

    #[test]
    fn unrelated_output_scores_zero() {
        let report = check_similarity(
            "The cat sat on the mat.",
            "purple engines hum quietly",
            3,
            0.8,
        );
        assert_eq!(report.highest, 0.0);
        assert!(!report.too_similar);
        assert!(report.similar_phrases.is_empty());
    }

    #[test]
    fn partial_overlap_averages_windows() {
        let report = check_similarity(
            "the cat sat on the mat",
            "the cat sat on a hat",
            5,
            0.8,
        );
        assert!((report.highest - 0.8).abs() < 1e-6);
        assert!((report.average - 0.7).abs() < 1e-6);
        assert!(report.too_similar);
        assert_eq!(report.similar_phrases, vec!["the cat sat on a"]);
    }

    #[test]
    fn short_output_is_one_window() {
        let report = check_similarity("the cat sat on the mat", "Cat, sat!", 5, 0.9);
        assert_eq!(report.highest, 1.0);
        assert_eq!(report.similar_phrases, vec!["cat sat"]);
    }

    #[test]
    fn corpus_shorter_than_window() {
        let report = check_similarity("cat sat", "the cat sat on", 3, 0.5);
        // [the cat sat] vs [cat sat]: LCS 2 → 4/5
        assert!((report.highest - 0.8).abs() < 1e-6);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(
            check_similarity("some corpus", "", 5, 0.8),
            SimilarityReport::default()
        );
        assert_eq!(
            check_similarity("", "some output", 5, 0.8),
            SimilarityReport::default()
        );
    }
}
