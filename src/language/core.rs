use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;
use std::path::Path;

use super::difficulty::Difficulty;
use crate::error::{Error, Result};

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// One embedded tier file
#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

/// Word lists keyed by difficulty tier. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    tiers: HashMap<Difficulty, Vec<String>>,
}

impl WordBank {
    /// The bank compiled into the binary. A tier that fails to load is left
    /// empty and reported; generation then falls back to the default sentence.
    pub fn builtin() -> Self {
        let mut tiers = HashMap::new();
        for difficulty in Difficulty::ALL {
            match read_word_list(&format!("{difficulty}.json")) {
                Ok(list) => {
                    tiers.insert(difficulty, list.words);
                }
                Err(e) => log::error!("failed to load {difficulty} word list: {e}"),
            }
        }
        Self { tiers }
    }

    pub fn from_tiers<I, W>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (Difficulty, Vec<W>)>,
        W: Into<String>,
    {
        Self {
            tiers: tiers
                .into_iter()
                .map(|(d, words)| (d, words.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Parse a custom bank of the form `{"easy": [...], "medium": [...], "hard": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tiers: HashMap<Difficulty, Vec<String>> = from_str(json)?;
        Ok(Self { tiers })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::WordBankIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Fill every missing or empty tier from `fallback`.
    pub fn with_fallback(mut self, fallback: &WordBank) -> Self {
        for difficulty in Difficulty::ALL {
            if self.words(difficulty).is_empty() {
                log::warn!("word bank has no {difficulty} words, using fallback list");
                self.tiers.insert(difficulty, fallback.words(difficulty).to_vec());
            }
        }
        self
    }

    pub fn words(&self, difficulty: Difficulty) -> &[String] {
        self.tiers.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Errors on the first empty tier.
    pub fn validate(&self) -> Result<()> {
        match Difficulty::ALL
            .into_iter()
            .find(|d| self.words(*d).is_empty())
        {
            Some(d) => Err(Error::EmptyTier(d)),
            None => Ok(()),
        }
    }
}

fn read_word_list(file_name: &str) -> Result<WordList> {
    let contents = WORDS_DIR
        .get_file(file_name)
        .and_then(|f| f.contents_utf8())
        .unwrap_or_default();

    Ok(from_str(contents)?)
}
