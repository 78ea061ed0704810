use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::language::{
    ConnectorSelector, Difficulty, RandomSelector, SentenceFormatter, TextFormatter, WordBank,
    WordSelector,
};

/// Returned whenever a tier has nothing to draw from
pub const DEFAULT_QUOTE: &str = "Default sentence for testing.";

/// Word count of a [`GenerationPolicy::Connected`] quote
pub const CONNECTED_WORD_TARGET: usize = 100;

/// How long a quote is and how it is assembled
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationPolicy {
    /// 100 words with occasional connectors between clauses
    #[default]
    Connected,
    /// 50 words on easy, 80 otherwise, no connectors
    Fixed,
}

impl GenerationPolicy {
    fn selector(self, difficulty: Difficulty) -> Box<dyn WordSelector> {
        match self {
            GenerationPolicy::Connected => Box::new(ConnectorSelector {
                target: CONNECTED_WORD_TARGET,
            }),
            GenerationPolicy::Fixed => Box::new(RandomSelector {
                count: fixed_word_count(difficulty),
            }),
        }
    }
}

pub fn fixed_word_count(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 50,
        Difficulty::Medium | Difficulty::Hard => 80,
    }
}

/// Builds target sentences from a word bank
#[derive(Debug, Clone)]
pub struct QuoteGenerator {
    bank: WordBank,
    policy: GenerationPolicy,
}

impl QuoteGenerator {
    pub fn new(bank: WordBank, policy: GenerationPolicy) -> Self {
        Self { bank, policy }
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// Generate a quote for a raw tier tag; unknown tags use the easy tier.
    pub fn generate(&self, difficulty: &str, rng: &mut dyn RngCore) -> String {
        self.generate_for(Difficulty::resolve(difficulty), rng)
    }

    pub fn generate_for(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> String {
        let words = self.bank.words(difficulty);
        if words.is_empty() {
            log::error!("no words available for difficulty {difficulty}");
            return DEFAULT_QUOTE.to_string();
        }

        let selected = self.policy.selector(difficulty).select_words(words, rng);
        let word_count = selected.len();
        let quote = SentenceFormatter.format(selected);
        if quote.is_empty() {
            log::error!("quote generation produced no text for {difficulty}");
            return DEFAULT_QUOTE.to_string();
        }

        log::debug!(
            "generated {difficulty} quote: {} chars, {word_count} words",
            quote.chars().count()
        );
        quote
    }
}
