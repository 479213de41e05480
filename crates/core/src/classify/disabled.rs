use crate::classify::{ClassifyError, WordClassifier};
use crate::emotion::WordProfile;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Used when no DeepSeek API key is configured. Every unknown word simply
/// degrades to not-found.
#[derive(Clone, Debug, Default)]
pub struct DisabledClassifier;

impl WordClassifier for DisabledClassifier {
    fn classify(&self, _word: String) -> BoxFuture<'_, Result<WordProfile, ClassifyError>> {
        async { Err(ClassifyError::Disabled) }.boxed()
    }
}
