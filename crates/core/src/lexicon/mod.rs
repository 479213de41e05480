//! Static word-emotion lookup store.
//!
//! The word database is partitioned into one JSON file per leading letter
//! (`a.json` .. `z.json`) plus `numbers.json` and `symbols.json`. All
//! partitions are flattened into a single in-memory map at startup and the
//! store is read-only afterwards.

use crate::emotion::WordProfile;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum LexiconError {
    #[error("words directory not found: {0}")]
    MissingDir(String),
    #[error("failed to read words directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct Partition {
    #[serde(default)]
    words: Vec<PartitionEntry>,
}

#[derive(Deserialize)]
struct PartitionEntry {
    word: String,
    stats: serde_json::Value,
}

/// Lowercase a token and strip everything that is not alphanumeric. This is
/// the key form for every lookup.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[derive(Debug, Default)]
pub struct Lexicon {
    words: HashMap<String, WordProfile>,
}

impl Lexicon {
    /// Load every `*.json` partition under `dir`. A malformed partition or
    /// entry is skipped with a warning; only a missing directory is fatal.
    pub fn load_dir(dir: &Path) -> Result<Self, LexiconError> {
        if !dir.is_dir() {
            return Err(LexiconError::MissingDir(dir.display().to_string()));
        }

        let mut lexicon = Self::default();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(raw) => lexicon.load_partition(&raw, &path.display().to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, partition = %path.display(), "failed to read partition");
                }
            }
        }

        tracing::info!(words = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    /// Parse one partition's JSON body and merge its entries.
    fn load_partition(&mut self, raw: &str, source: &str) {
        let partition: Partition = match serde_json::from_str(raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, partition = source, "skipping malformed partition");
                return;
            }
        };

        for entry in partition.words {
            let key = normalize_word(&entry.word);
            if key.is_empty() {
                tracing::warn!(word = %entry.word, partition = source, "skipping entry with empty key");
                continue;
            }
            match serde_json::from_value::<WordProfile>(entry.stats) {
                Ok(profile) => {
                    self.words.insert(key, profile);
                }
                Err(e) => {
                    tracing::warn!(error = %e, word = %entry.word, partition = source, "skipping malformed entry");
                }
            }
        }
    }

    /// Build a lexicon directly from entries. Mainly for tests.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, WordProfile)>,
    {
        let words = entries
            .into_iter()
            .map(|(w, p)| (normalize_word(&w), p))
            .collect();
        Self { words }
    }

    pub fn lookup(&self, word: &str) -> Option<&WordProfile> {
        let key = normalize_word(word);
        if key.is_empty() {
            return None;
        }
        self.words.get(&key)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
