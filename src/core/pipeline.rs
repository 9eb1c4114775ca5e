//! The generation pipeline: corpus text → sanitized word sequence.
//!
//! [`generate`] builds a fresh model per call; nothing is cached or shared
//! between calls. [`generate_from_model`] walks a model trained earlier, such
//! as one read back with [`load_model`](crate::core::markov::load_model).

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::corpus;
use crate::core::markov::{Chooser, Generation, MarkovError, MarkovTrainer, TransitionModel};
use crate::core::sanitize::sanitize;

/// Generate `length` words in the style of `corpus_text`.
///
/// `seed` is raw text and goes through the corpus normalizer, so `"The Cat"`
/// matches the key `(the, cat)`. Seed text that normalizes to nothing counts
/// as no seed. The returned words are already sanitized; recoveries taken
/// during the walk are reported alongside them.
pub fn generate<C: Chooser + ?Sized>(
    corpus_text: &str,
    order: usize,
    length: usize,
    seed: Option<&str>,
    chooser: &mut C,
) -> Result<Generation, MarkovError> {
    let tokens = corpus::normalize(corpus_text);
    let model = MarkovTrainer::train(&tokens, order)?;
    Ok(generate_from_model(&model, length, seed, chooser))
}

/// Walk an existing model the same way [`generate`] does: normalize the
/// seed, sample, then sanitize. The walk uses the model's own order.
pub fn generate_from_model<C: Chooser + ?Sized>(
    model: &TransitionModel,
    length: usize,
    seed: Option<&str>,
    chooser: &mut C,
) -> Generation {
    let seed_tokens = seed.map(corpus::normalize).filter(|s| !s.is_empty());
    let mut generation = model.sample(length, seed_tokens.as_deref(), chooser);
    sanitize(&mut generation.words);
    generation
}

/// [`generate`] with a reproducible RNG.
pub fn generate_seeded(
    corpus_text: &str,
    order: usize,
    length: usize,
    seed: Option<&str>,
    rng_seed: u64,
) -> Result<Generation, MarkovError> {
    let mut rng = StdRng::seed_from_u64(rng_seed);
    generate(corpus_text, order, length, seed, &mut rng)
}

/// Join generated words with single spaces.
pub fn join(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "The cat sat on the mat. The dog sat on the log! \
                          (The bird) sat on the cat, and the cat ran.";

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate_seeded(CORPUS, 2, 25, None, 42).unwrap();
        let b = generate_seeded(CORPUS, 2, 25, None, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_text_is_normalized() {
        let generation = generate_seeded(CORPUS, 2, 1, Some("The, CAT"), 1).unwrap();
        assert_eq!(&generation.words[..2], &["the", "cat"]);
        assert!(generation.recoveries.is_empty());
    }

    #[test]
    fn unknown_seed_is_reported_not_fatal() {
        let generation = generate_seeded(CORPUS, 2, 10, Some("purple elephant"), 3).unwrap();
        assert_eq!(&generation.words[..2], &["purple", "elephant"]);
        assert_eq!(generation.recoveries[0].step, 0);
        assert_eq!(generation.recoveries[0].missing_key, vec!["purple", "elephant"]);
    }

    #[test]
    fn blank_seed_counts_as_absent() {
        let generation = generate_seeded(CORPUS, 2, 5, Some(" ... "), 9).unwrap();
        assert!(generation.words.len() >= 5);
    }

    #[test]
    fn sanitizing_removes_at_most_two_words() {
        for rng_seed in 0..50 {
            let generation = generate_seeded(CORPUS, 1, 12, None, rng_seed).unwrap();
            let len = generation.words.len();
            assert!((11..=13).contains(&len), "unexpected length {}", len);
        }
    }

    #[test]
    fn trained_model_walks_like_generate() {
        let model = MarkovTrainer::train_text(CORPUS, 2).unwrap();
        for rng_seed in 0..10 {
            let expected = generate_seeded(CORPUS, 2, 15, Some("the cat"), rng_seed).unwrap();
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let actual = generate_from_model(&model, 15, Some("the cat"), &mut rng);
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn empty_corpus_yields_sentinel_output() {
        let generation = generate_seeded("", 2, 2, None, 0).unwrap();
        assert_eq!(generation.words.len(), 4);
        assert_eq!(&generation.words[..3], &[".", ".", " "]);
    }

    #[test]
    fn zero_order_fails() {
        assert!(matches!(
            generate_seeded(CORPUS, 0, 5, None, 0),
            Err(MarkovError::InvalidOrder(0))
        ));
    }

    #[test]
    fn join_uses_single_spaces() {
        let words = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(join(&words), "a b c");
        assert_eq!(join(&[]), "");
    }
}
