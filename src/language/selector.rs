use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Joining words inserted between clauses by [`ConnectorSelector`]
pub const CONNECTORS: [&str; 5] = ["and", "but", "or", "while", "because"];

/// Trait for different word selection strategies
pub trait WordSelector {
    /// Pick the ordered word sequence for one quote from a tier's vocabulary
    fn select_words(&self, words: &[String], rng: &mut dyn RngCore) -> Vec<String>;
}

/// Uniform picks with replacement, a fixed number of times.
pub struct RandomSelector {
    pub count: usize,
}

impl WordSelector for RandomSelector {
    fn select_words(&self, words: &[String], rng: &mut dyn RngCore) -> Vec<String> {
        (0..self.count)
            .filter_map(|_| words.choose(&mut *rng).cloned())
            .collect()
    }
}

/// Subject, verb and an optional complement, then uniform picks with a
/// connector sometimes dropped in on every fifth word. The connector counts
/// toward `target`, so the result holds exactly `target` words.
pub struct ConnectorSelector {
    pub target: usize,
}

impl WordSelector for ConnectorSelector {
    fn select_words(&self, words: &[String], rng: &mut dyn RngCore) -> Vec<String> {
        if words.is_empty() || self.target == 0 {
            return Vec::new();
        }

        let pick = |rng: &mut dyn RngCore| words.choose(rng).cloned().unwrap_or_default();
        let mut selected = Vec::with_capacity(self.target + 1);

        // subject, verb
        selected.push(pick(&mut *rng));
        if self.target > 1 {
            selected.push(pick(&mut *rng));
        }
        // complement
        if selected.len() < self.target && rng.gen::<f64>() > 0.3 {
            selected.push(pick(&mut *rng));
        }

        while selected.len() < self.target {
            selected.push(pick(&mut *rng));
            let count = selected.len();
            if count % 5 == 0 && count + 1 < self.target && rng.gen::<f64>() > 0.5 {
                if let Some(connector) = CONNECTORS.choose(&mut *rng) {
                    selected.push(connector.to_string());
                }
            }
        }

        selected
    }
}
