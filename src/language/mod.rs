pub mod core;
pub mod difficulty;
pub mod formatter;
pub mod selector;

// Re-export the main types for convenience
pub use core::{WordBank, WordList};
pub use difficulty::Difficulty;
pub use formatter::{BasicFormatter, SentenceFormatter, TextFormatter};
pub use selector::{ConnectorSelector, RandomSelector, WordSelector, CONNECTORS};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_integrated_functionality() {
        let bank = WordBank::builtin();
        let mut rng = StdRng::seed_from_u64(11);

        let words =
            RandomSelector { count: 5 }.select_words(bank.words(Difficulty::Hard), &mut rng);
        assert_eq!(words.len(), 5);

        let formatted = SentenceFormatter.format(words);
        assert!(formatted.chars().next().unwrap().is_uppercase());
        assert!(formatted.ends_with('.'));
    }
}
