//! Markov transition model — training, sampling, and RON persistence.

use rand::{Rng, RngCore};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::corpus;

#[derive(Debug, Error)]
pub enum MarkovError {
    #[error("Markov order must be at least 1 (got {0})")]
    InvalidOrder(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),
    #[error("malformed model: {0}")]
    MalformedModel(String),
}

/// Successor recorded for a window that ends the corpus. Also fills the
/// sentinel key.
pub const TERMINATOR: &str = ".";
/// The single successor of the sentinel key.
pub const FILLER: &str = " ";

/// Upper bound on the words reserved before a walk starts. Longer walks grow
/// the buffer as they go.
const MAX_RESERVED_WORDS: usize = 4096;

/// A fixed-length run of `order` tokens used as a lookup key.
pub type TransitionKey = Vec<String>;

/// Source of uniform random choices for the sampler.
///
/// `choose_index(len)` must return a value in `0..len`; `len` is never zero.
/// Every `rand` generator is a `Chooser`; tests can script their own.
pub trait Chooser {
    fn choose_index(&mut self, len: usize) -> usize;
}

impl<R: RngCore> Chooser for R {
    fn choose_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// A trained transition model mapping each key to the tokens observed after it.
///
/// Keys are kept in first-seen order so a seeded random key choice is
/// reproducible. Successor lists keep duplicates, which weights sampling by
/// observed frequency.
///
/// ## Invariants
/// - Every key has exactly `order` tokens and a non-empty successor list
/// - The sentinel key (`TERMINATOR` × order) is always present
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "ModelFile", try_from = "ModelFile")]
pub struct TransitionModel {
    order: usize,
    keys: Vec<TransitionKey>,
    successors: Vec<Vec<String>>,
    index: FxHashMap<TransitionKey, usize>,
}

/// On-disk form: the index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct ModelFile {
    order: usize,
    entries: Vec<(TransitionKey, Vec<String>)>,
}

impl From<TransitionModel> for ModelFile {
    fn from(model: TransitionModel) -> Self {
        Self {
            order: model.order,
            entries: model.keys.into_iter().zip(model.successors).collect(),
        }
    }
}

impl TryFrom<ModelFile> for TransitionModel {
    type Error = MarkovError;

    fn try_from(file: ModelFile) -> Result<Self, Self::Error> {
        if file.order == 0 {
            return Err(MarkovError::InvalidOrder(0));
        }
        let mut model = Self {
            order: file.order,
            keys: Vec::with_capacity(file.entries.len()),
            successors: Vec::with_capacity(file.entries.len()),
            index: FxHashMap::default(),
        };
        for (key, successors) in file.entries {
            if key.len() != model.order {
                return Err(MarkovError::MalformedModel(format!(
                    "key {:?} does not have {} tokens",
                    key, model.order
                )));
            }
            if successors.is_empty() {
                return Err(MarkovError::MalformedModel(format!(
                    "key {:?} has no successors",
                    key
                )));
            }
            for next in successors {
                model.add_transition(key.clone(), next);
            }
        }
        if !model.contains_key(&Self::sentinel_key(model.order)) {
            return Err(MarkovError::MalformedModel("sentinel key is missing".into()));
        }
        Ok(model)
    }
}

/// A walk that hit a key missing from the model and jumped to a random one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recovery {
    /// Zero-based sampling step at which the miss happened.
    pub step: usize,
    pub missing_key: TransitionKey,
    pub reseeded_with: TransitionKey,
}

impl Recovery {
    /// True when the starting key itself was missing. A random start is
    /// always a key, so only a caller-supplied seed can miss at step 0.
    pub fn is_seed_miss(&self) -> bool {
        self.step == 0
    }
}

/// Output of one sampling walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub words: Vec<String>,
    pub recoveries: Vec<Recovery>,
}

impl TransitionModel {
    /// Create a model holding only the sentinel entry.
    pub fn new(order: usize) -> Result<Self, MarkovError> {
        if order == 0 {
            return Err(MarkovError::InvalidOrder(order));
        }
        let mut model = Self {
            order,
            keys: Vec::new(),
            successors: Vec::new(),
            index: FxHashMap::default(),
        };
        model.add_transition(Self::sentinel_key(order), FILLER.to_string());
        Ok(model)
    }

    /// The all-terminator key every model contains.
    pub fn sentinel_key(order: usize) -> TransitionKey {
        vec![TERMINATOR.to_string(); order]
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct keys, sentinel included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: the sentinel entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total number of recorded transitions across all keys.
    pub fn transition_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &[String]> {
        self.keys.iter().map(Vec::as_slice)
    }

    /// Successors observed after `key`, in corpus order.
    pub fn successors(&self, key: &[String]) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&idx| self.successors[idx].as_slice())
    }

    pub fn contains_key(&self, key: &[String]) -> bool {
        self.index.contains_key(key)
    }

    /// Record that `next` followed `key`, creating the entry if needed.
    pub fn add_transition(&mut self, key: TransitionKey, next: String) {
        debug_assert_eq!(key.len(), self.order, "key length must equal the order");
        match self.index.get(&key) {
            Some(&idx) => self.successors[idx].push(next),
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.successors.push(vec![next]);
            }
        }
    }

    /// Pick a key uniformly at random.
    pub fn random_key<C: Chooser + ?Sized>(&self, chooser: &mut C) -> &[String] {
        &self.keys[chooser.choose_index(self.keys.len())]
    }

    /// Walk the model for `length` steps.
    ///
    /// The output starts with `seed` (or a random key when the seed is absent
    /// or empty) and grows by one sampled successor per step, so it always
    /// holds `start.len() + length` tokens. When the current window is not a
    /// key, the walk jumps to a random key, records a [`Recovery`], and keeps
    /// going. A seed whose length differs from the order can never match and
    /// recovers on the first step.
    pub fn sample<C: Chooser + ?Sized>(
        &self,
        length: usize,
        seed: Option<&[String]>,
        chooser: &mut C,
    ) -> Generation {
        let mut current: TransitionKey = match seed {
            Some(seed) if !seed.is_empty() => seed.to_vec(),
            _ => self.random_key(chooser).to_vec(),
        };

        let mut words = Vec::with_capacity(current.len() + length.min(MAX_RESERVED_WORDS));
        words.extend(current.iter().cloned());
        let mut recoveries = Vec::new();

        for step in 0..length {
            let idx = match self.index.get(current.as_slice()) {
                Some(&idx) => idx,
                None => {
                    let idx = chooser.choose_index(self.keys.len());
                    let reseeded = self.keys[idx].clone();
                    log::warn!(
                        "key {:?} not found in corpus at step {}; reseeding from {:?}",
                        current.join(" "),
                        step,
                        reseeded.join(" ")
                    );
                    let missing = std::mem::replace(&mut current, reseeded.clone());
                    recoveries.push(Recovery {
                        step,
                        missing_key: missing,
                        reseeded_with: reseeded,
                    });
                    idx
                }
            };

            let options = &self.successors[idx];
            let next = options[chooser.choose_index(options.len())].clone();

            // Slide the window
            current.remove(0);
            current.push(next.clone());
            words.push(next);
        }

        Generation { words, recoveries }
    }
}

/// Builds transition models from token sequences.
pub struct MarkovTrainer;

impl MarkovTrainer {
    /// Train an order-`order` model over every overlapping window of `tokens`.
    ///
    /// The window ending the corpus records `TERMINATOR` as its successor.
    /// Fewer than `order` tokens leaves only the sentinel entry.
    pub fn train(tokens: &[String], order: usize) -> Result<TransitionModel, MarkovError> {
        let mut model = TransitionModel::new(order)?;

        if tokens.len() >= order {
            for (i, window) in tokens.windows(order).enumerate() {
                let next = tokens
                    .get(i + order)
                    .cloned()
                    .unwrap_or_else(|| TERMINATOR.to_string());
                model.add_transition(window.to_vec(), next);
            }
        }

        log::debug!(
            "trained order-{} model: {} tokens, {} keys, {} transitions",
            order,
            tokens.len(),
            model.len(),
            model.transition_count()
        );
        Ok(model)
    }

    /// Normalize raw corpus text and train on the resulting tokens.
    pub fn train_text(text: &str, order: usize) -> Result<TransitionModel, MarkovError> {
        Self::train(&corpus::normalize(text), order)
    }
}

/// Save a TransitionModel to a RON file.
pub fn save_model(model: &TransitionModel, path: &std::path::Path) -> Result<(), MarkovError> {
    let serialized = ron::ser::to_string_pretty(model, ron::ser::PrettyConfig::default())?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load a TransitionModel from a RON file.
pub fn load_model(path: &std::path::Path) -> Result<TransitionModel, MarkovError> {
    let contents = std::fs::read_to_string(path)?;
    let model: TransitionModel = ron::from_str(&contents)?;
    Ok(model)
}
