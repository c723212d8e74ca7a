//! Character-level Markov model and its generation walk.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

use super::frequency::FrequencyTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkovError {
    #[error("window length must be at least 1, got {0}")]
    InvalidWindowLength(usize),
}

/// A fixed-order character model.
///
/// Maps every window of `window_length` characters seen during training to
/// the distribution of characters that followed it.
#[derive(Debug, Clone)]
pub struct MarkovModel {
    window_length: usize,
    /// Window contents → next-character table.
    tables: FxHashMap<String, FrequencyTable>,
    rng: StdRng,
}

impl MarkovModel {
    /// Create an untrained model.
    ///
    /// With `Some(seed)` every `generate` call sequence is reproducible for
    /// the same training data; `None` seeds from OS entropy.
    pub fn new(window_length: usize, seed: Option<u64>) -> Result<Self, MarkovError> {
        if window_length == 0 {
            return Err(MarkovError::InvalidWindowLength(window_length));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            window_length,
            tables: FxHashMap::default(),
            rng,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Number of distinct trained windows.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, window: &str) -> Option<&FrequencyTable> {
        self.tables.get(window)
    }

    pub fn windows(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Forget everything learned so far.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Learn window → next-character counts from `corpus`.
    ///
    /// Counts are accumulated over the whole text before any table is
    /// normalized. Calling `train` again adds to the existing counts.
    /// A corpus shorter than `window_length + 1` characters teaches nothing.
    pub fn train(&mut self, corpus: &str) {
        let chars: Vec<char> = corpus.chars().collect();
        if chars.len() <= self.window_length {
            debug!(
                "corpus of {} chars is too short for window length {}, nothing learned",
                chars.len(),
                self.window_length
            );
            return;
        }

        for slice in chars.windows(self.window_length + 1) {
            let (window, next) = slice.split_at(self.window_length);
            let window: String = window.iter().collect();
            self.tables.entry(window).or_default().update(next[0]);
        }

        for table in self.tables.values_mut() {
            table.compute_probabilities();
        }

        debug!(
            "trained on {} chars: {} windows, {} transitions",
            chars.len(),
            self.tables.len(),
            self.tables.values().map(FrequencyTable::len).sum::<usize>()
        );
    }

    /// Extend `seed_text` by up to `length` characters using the model's own
    /// random source.
    ///
    /// Generation stops early when the trailing window was never seen in
    /// training. A seed shorter than the window is returned unchanged.
    pub fn generate(&mut self, seed_text: &str, length: usize) -> String {
        walk(&self.tables, self.window_length, &mut self.rng, seed_text, length)
    }

    /// Same as [`generate`](Self::generate), drawing from a caller-supplied
    /// random source so a trained model can be shared between callers.
    pub fn generate_with<R: Rng>(
        &self,
        rng: &mut R,
        seed_text: &str,
        length: usize,
    ) -> String {
        walk(&self.tables, self.window_length, rng, seed_text, length)
    }
}

fn walk<R: Rng>(
    tables: &FxHashMap<String, FrequencyTable>,
    window_length: usize,
    rng: &mut R,
    seed_text: &str,
    length: usize,
) -> String {
    let seed_len = seed_text.chars().count();
    if seed_len < window_length {
        return seed_text.to_owned();
    }

    let mut generated = seed_text.to_owned();
    let mut window: String = seed_text.chars().skip(seed_len - window_length).collect();

    for step in 0..length {
        let Some(table) = tables.get(&window) else {
            trace!("dead end at {:?} after {} chars", window, step);
            break;
        };

        let draw: f64 = rng.gen();
        let Some(next) = table.sample(draw) else {
            trace!("no transition for draw {} from {:?}", draw, window);
            break;
        };

        generated.push(next);
        window.remove(0);
        window.push(next);
    }

    generated
}

impl fmt::Display for MarkovModel {
    /// One line per window, sorted so the dump is reproducible.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut windows: Vec<&String> = self.tables.keys().collect();
        windows.sort();
        for window in windows {
            writeln!(f, "{} : {}", window, self.tables[window])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_test_corpus(window_length: usize) -> MarkovModel {
        let corpus = std::fs::read_to_string("tests/fixtures/test_corpus.txt").unwrap();
        let mut model = MarkovModel::new(window_length, Some(42)).unwrap();
        model.train(&corpus);
        model
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = MarkovModel::new(0, None).unwrap_err();
        assert_eq!(err, MarkovError::InvalidWindowLength(0));
    }

    #[test]
    fn alternating_corpus_tables() {
        let mut model = MarkovModel::new(2, Some(1)).unwrap();
        model.train("ababab");

        assert_eq!(model.len(), 2);
        let ab = model.table("ab").unwrap();
        assert_eq!(ab.len(), 1);
        assert_eq!(ab.get('a').unwrap().count, 2);
        let ba = model.table("ba").unwrap();
        assert_eq!(ba.len(), 1);
        assert_eq!(ba.get('b').unwrap().count, 2);
    }

    #[test]
    fn alternating_corpus_generates_the_pattern() {
        let mut model = MarkovModel::new(2, None).unwrap();
        model.train("ababab");
        for _ in 0..20 {
            assert_eq!(model.generate("ab", 4), "ababab");
        }
    }

    #[test]
    fn minimal_corpus_walks_once_then_dies() {
        let mut model = MarkovModel::new(3, Some(7)).unwrap();
        model.train("abcd");

        assert_eq!(model.len(), 1);
        let obs = &model.table("abc").unwrap().observations()[0];
        assert_eq!(obs.character, 'd');
        assert_eq!(obs.count, 1);
        assert!((obs.p - 1.0).abs() < 1e-9);
        assert!((obs.cp - 1.0).abs() < 1e-9);

        assert_eq!(model.generate("abc", 5), "abcd");
    }

    #[test]
    fn huge_budget_still_stops_at_dead_end() {
        let mut model = MarkovModel::new(3, Some(7)).unwrap();
        model.train("abcd");

        assert_eq!(model.generate("abc", usize::MAX), "abcd");
        assert_eq!(model.generate("abc", usize::MAX / 2), "abcd");
    }

    #[test]
    fn short_corpus_teaches_nothing() {
        let mut model = MarkovModel::new(4, Some(7)).unwrap();
        model.train("abcd");
        assert!(model.is_empty());
        assert_eq!(model.generate("abcd", 10), "abcd");
    }

    #[test]
    fn short_seed_is_returned_unchanged() {
        let mut model = train_test_corpus(4);
        assert_eq!(model.generate("the", 50), "the");
        assert_eq!(model.generate("", 50), "");
    }

    #[test]
    fn unknown_window_returns_seed() {
        let mut model = train_test_corpus(3);
        assert_eq!(model.generate("zzqx", 30), "zzqx");
    }

    #[test]
    fn window_comes_from_end_of_seed() {
        let mut model = MarkovModel::new(3, Some(7)).unwrap();
        model.train("abcd");
        assert_eq!(model.generate("zzzabc", 5), "zzzabcd");
    }

    #[test]
    fn retraining_accumulates_counts() {
        let mut model = MarkovModel::new(3, Some(7)).unwrap();
        model.train("abcd");
        model.train("abce");

        let table = model.table("abc").unwrap();
        assert_eq!(table.total_count(), 2);
        assert!((table.get('d').unwrap().p - 0.5).abs() < 1e-9);
        assert!((table.observations().last().unwrap().cp - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clear_forgets_training() {
        let mut model = train_test_corpus(2);
        assert!(!model.is_empty());
        model.clear();
        assert!(model.is_empty());
    }

    #[test]
    fn windows_are_case_and_whitespace_sensitive() {
        let mut model = MarkovModel::new(2, Some(3)).unwrap();
        model.train("Ab ab a");
        assert!(model.table("Ab").is_some());
        assert!(model.table("ab").is_some());
        assert!(model.table("b ").is_some());
        assert!(model.table("AB").is_none());
    }

    #[test]
    fn multibyte_characters_are_single_steps() {
        let mut model = MarkovModel::new(2, Some(3)).unwrap();
        model.train("héhéhé");
        assert_eq!(model.table("hé").unwrap().get('h').unwrap().count, 2);
        assert_eq!(model.generate("éh", 3), "éhéhé");
    }

    #[test]
    fn generate_deterministic() {
        let mut model1 = train_test_corpus(3);
        let mut model2 = train_test_corpus(3);

        let result1 = model1.generate("The", 200);
        let result2 = model2.generate("The", 200);
        assert_eq!(result1, result2);
    }

    #[test]
    fn generate_with_borrows_model() {
        let model = train_test_corpus(3);
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let result1 = model.generate_with(&mut rng1, "The", 100);
        let result2 = model.generate_with(&mut rng2, "The", 100);
        assert_eq!(result1, result2);
        assert!(result1.starts_with("The"));
    }

    #[test]
    fn display_dumps_sorted_windows() {
        let mut model = MarkovModel::new(2, Some(1)).unwrap();
        model.train("ababab");
        assert_eq!(model.to_string(), "ab : ((a 2 1 1))\nba : ((b 2 1 1))\n");
    }
}
