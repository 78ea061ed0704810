/// Trait for text formatting strategies
pub trait TextFormatter {
    /// Format a list of words into a final string
    fn format(&self, words: Vec<String>) -> String;
}

/// Basic formatter that just joins words with spaces
pub struct BasicFormatter;

impl TextFormatter for BasicFormatter {
    fn format(&self, words: Vec<String>) -> String {
        words.join(" ")
    }
}

/// Joins words into a sentence: capitalized first letter, terminal punctuation.
pub struct SentenceFormatter;

impl TextFormatter for SentenceFormatter {
    fn format(&self, words: Vec<String>) -> String {
        let mut text = BasicFormatter.format(words);
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
        if text.is_empty() {
            return text;
        }

        text = capitalize_first_letter(&text);
        if !ends_with_terminal_punctuation(&text) {
            text.push('.');
        }
        text
    }
}

pub fn ends_with_terminal_punctuation(text: &str) -> bool {
    text.ends_with(['.', '!', '?'])
}

/// Helper function to capitalize the first letter of a word
pub fn capitalize_first_letter(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => first.to_uppercase().chain(chars).collect(),
        _ => word.to_string(),
    }
}
