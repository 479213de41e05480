mod deepseek;
mod disabled;

use crate::emotion::WordProfile;
use futures::future::BoxFuture;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub use deepseek::DeepSeekClassifier;
pub use disabled::DisabledClassifier;

#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("classifier disabled: no api key configured")]
    Disabled,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Classifies a single out-of-vocabulary word into a [`WordProfile`]. A
/// failure degrades that word to not-found at the call site; it never fails
/// the surrounding phrase analysis.
pub trait WordClassifier: Send + Sync {
    fn classify(&self, word: String) -> BoxFuture<'_, Result<WordProfile, ClassifyError>>;
}

/// In-process cache of classified words. Populated lazily, lives for the
/// process lifetime, never persisted.
#[derive(Debug, Default)]
pub struct ClassifierCache {
    words: RwLock<HashMap<String, WordProfile>>,
}

impl ClassifierCache {
    pub async fn get(&self, word: &str) -> Option<WordProfile> {
        self.words.read().await.get(word).cloned()
    }

    pub async fn insert(&self, word: String, profile: WordProfile) {
        self.words.write().await.insert(word, profile);
    }

    pub async fn len(&self) -> usize {
        self.words.read().await.len()
    }
}
