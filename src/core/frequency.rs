//! Per-window next-character frequency tables.

use std::fmt;

/// One observed next-character for a window.
///
/// `p` and `cp` stay at `0.0` until [`FrequencyTable::compute_probabilities`]
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CharObservation {
    pub character: char,
    pub count: u64,
    /// Probability of `character` following the window.
    pub p: f64,
    /// Running sum of `p` up to and including this entry.
    pub cp: f64,
}

impl CharObservation {
    fn new(character: char) -> Self {
        Self {
            character,
            count: 1,
            p: 0.0,
            cp: 0.0,
        }
    }
}

impl fmt::Display for CharObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {} {})", self.character, self.count, self.p, self.cp)
    }
}

/// Observations for a single window, kept in first-seen order.
///
/// The order is significant: probabilities are accumulated and sampled in
/// the same sequence, so a given draw always resolves to the same character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    observations: Vec<CharObservation>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `character` after this table's window.
    pub fn update(&mut self, character: char) {
        if let Some(entry) = self
            .observations
            .iter_mut()
            .find(|obs| obs.character == character)
        {
            entry.count = entry.count.saturating_add(1);
        } else {
            self.observations.push(CharObservation::new(character));
        }
    }

    /// Derive `p` and `cp` for every observation from the current counts.
    ///
    /// An empty table is left untouched.
    pub fn compute_probabilities(&mut self) {
        let total = self.total_count();
        if total == 0 {
            return;
        }

        let mut running = 0.0;
        for obs in &mut self.observations {
            obs.p = obs.count as f64 / total as f64;
            running += obs.p;
            obs.cp = running;
        }

        // Rounding can leave the sum just under 1.0; the last entry must
        // cover every draw in [0, 1).
        if let Some(last) = self.observations.last_mut() {
            last.cp = 1.0;
        }
    }

    /// Resolve a uniform draw in `[0, 1)` to a character.
    ///
    /// Returns the first observation whose cumulative probability reaches
    /// `draw`, or `None` if no entry does.
    pub fn sample(&self, draw: f64) -> Option<char> {
        self.observations
            .iter()
            .find(|obs| obs.cp >= draw)
            .map(|obs| obs.character)
    }

    pub fn observations(&self) -> &[CharObservation] {
        &self.observations
    }

    pub fn get(&self, character: char) -> Option<&CharObservation> {
        self.observations.iter().find(|obs| obs.character == character)
    }

    /// Sum of counts across all observations.
    pub fn total_count(&self) -> u64 {
        self.observations.iter().map(|obs| obs.count).sum()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, obs) in self.observations.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", obs)?;
        }
        write!(f, ")")
    }
}
