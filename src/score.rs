//! Accuracy and words-per-minute scoring.
//!
//! Everything here is a pure function of the quote, the typed attempt and
//! the elapsed time. Both texts are trimmed before comparison.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// How raw correct-word counts become a words-per-minute figure.
///
/// A session picks one policy at construction and uses it for every
/// recomputation.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WpmPolicy {
    /// `correct_words * 60 / elapsed_secs`, rounded
    #[default]
    #[value(name = "elapsed")]
    #[serde(rename = "elapsed")]
    #[strum(serialize = "elapsed")]
    ElapsedNormalized,
    /// twice the correct words on a 30 second run, the raw count otherwise
    DurationScaled,
}

impl WpmPolicy {
    /// Zero until at least one second has elapsed.
    pub fn wpm(self, correct_words: usize, elapsed_secs: u32, duration_secs: u32) -> u32 {
        if elapsed_secs == 0 {
            return 0;
        }
        match self {
            WpmPolicy::ElapsedNormalized => {
                (correct_words as f64 * 60.0 / elapsed_secs as f64).round() as u32
            }
            WpmPolicy::DurationScaled if duration_secs == 30 => 2 * correct_words as u32,
            WpmPolicy::DurationScaled => correct_words as u32,
        }
    }
}

/// Derived on demand, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSnapshot {
    pub accuracy_percent: u8,
    pub wpm: u32,
}

impl Default for ScoreSnapshot {
    fn default() -> Self {
        Self {
            accuracy_percent: 100,
            wpm: 0,
        }
    }
}

/// Tag each compared position. The result is aligned to the quote and as long
/// as the shorter of the two texts.
pub fn grade(quote: &str, typed: &str) -> Vec<Outcome> {
    quote
        .trim()
        .chars()
        .zip(typed.trim().chars())
        .map(|(expected, actual)| {
            if expected == actual {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        })
        .collect()
}

/// Percentage of typed characters that match the quote at the same position.
/// Characters typed past the end of the quote count against accuracy.
pub fn accuracy(quote: &str, typed: &str) -> u8 {
    let typed_len = typed.trim().chars().count();
    if typed_len == 0 {
        return 100;
    }
    let correct = grade(quote, typed)
        .into_iter()
        .filter(|o| *o == Outcome::Correct)
        .count();

    (100.0 * correct as f64 / typed_len as f64).round() as u8
}

/// Words in `typed` equal to the word at the same index in `quote`.
pub fn correct_words(quote: &str, typed: &str) -> usize {
    quote
        .split_whitespace()
        .zip(typed.split_whitespace())
        .filter(|(expected, actual)| expected == actual)
        .count()
}

pub fn snapshot(
    quote: &str,
    typed: &str,
    elapsed_secs: u32,
    duration_secs: u32,
    policy: WpmPolicy,
) -> ScoreSnapshot {
    ScoreSnapshot {
        accuracy_percent: accuracy(quote, typed),
        wpm: policy.wpm(correct_words(quote, typed), elapsed_secs, duration_secs),
    }
}

/// Compact `+`/`-` rendering of outcomes, handy in logs.
pub fn outcome_marks(outcomes: &[Outcome]) -> String {
    outcomes
        .iter()
        .map(|o| match o {
            Outcome::Correct => '+',
            Outcome::Incorrect => '-',
        })
        .join("")
}
