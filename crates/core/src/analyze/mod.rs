//! Phrase-level emotion analysis: tokenization, per-word resolution with a
//! bounded external-classification budget, and the weighted aggregation that
//! produces a [`PhraseAnalysis`].

mod context;
mod rank;

pub use rank::{reconcile, EmotionCounts};

use crate::classify::{ClassifierCache, WordClassifier};
use crate::config::{CONFIDENCE_THRESHOLD, MAX_TEXT_LEN, MAX_UNKNOWN_WORDS_PER_REQUEST};
use crate::emotion::{
    EmotionScores, PhraseAnalysis, Sentiment, SentimentPolarity, Vad, WordAnalysis, WordProfile,
};
use crate::lexicon::{normalize_word, Lexicon};
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("text must not be empty")]
    EmptyText,
    #[error("text exceeds {MAX_TEXT_LEN} characters")]
    TextTooLong,
}

/// One whitespace token with whatever profile resolution produced for it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedWord {
    pub raw: String,
    pub clean: String,
    pub profile: Option<WordProfile>,
}

pub fn validate_text(text: &str) -> Result<(), AnalyzeError> {
    if text.trim().is_empty() {
        return Err(AnalyzeError::EmptyText);
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(AnalyzeError::TextTooLong);
    }
    Ok(())
}

pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    classifier: Arc<dyn WordClassifier>,
    cache: ClassifierCache,
}

impl Analyzer {
    pub fn new(lexicon: Arc<Lexicon>, classifier: Arc<dyn WordClassifier>) -> Self {
        Self {
            lexicon,
            classifier,
            cache: ClassifierCache::default(),
        }
    }

    /// Words classified at runtime and cached for the process lifetime.
    pub async fn cached_words(&self) -> usize {
        self.cache.len().await
    }

    pub async fn analyze_text(&self, text: &str) -> Result<PhraseAnalysis, AnalyzeError> {
        validate_text(text)?;
        let resolved = self.resolve_words(text).await;
        Ok(aggregate(text, &resolved))
    }

    /// Resolve each token against the lexicon, then the classifier cache,
    /// then (within the per-request budget) the external classifier. Calls
    /// are sequential and never retried; a failed call degrades the word to
    /// not-found.
    async fn resolve_words(&self, text: &str) -> Vec<ResolvedWord> {
        let mut resolved = Vec::new();
        let mut budget = MAX_UNKNOWN_WORDS_PER_REQUEST;

        for token in text.split_whitespace() {
            let clean = normalize_word(token);
            if clean.is_empty() {
                resolved.push(ResolvedWord {
                    raw: token.to_owned(),
                    clean,
                    profile: None,
                });
                continue;
            }

            let profile = if let Some(p) = self.lexicon.lookup(&clean) {
                Some(p.clone())
            } else if let Some(p) = self.cache.get(&clean).await {
                Some(p)
            } else if budget > 0 {
                budget -= 1;
                match self.classifier.classify(clean.clone()).await {
                    Ok(p) => {
                        self.cache.insert(clean.clone(), p.clone()).await;
                        Some(p)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, word = %clean, "classification failed");
                        None
                    }
                }
            } else {
                tracing::debug!(word = %clean, "unknown-word budget exhausted");
                None
            };

            resolved.push(ResolvedWord {
                raw: token.to_owned(),
                clean,
                profile,
            });
        }

        resolved
    }
}

/// Combine resolved per-word profiles into a phrase-level result. Pure and
/// deterministic: the same rows always produce the same analysis.
pub fn aggregate(text: &str, words: &[ResolvedWord]) -> PhraseAnalysis {
    let word_count = words.len();
    let text_lower = text.to_lowercase();

    let mut word_analysis = Vec::with_capacity(word_count);
    let mut confident: Vec<&WordProfile> = Vec::new();
    let mut analyzed_words = 0;

    for word in words {
        match &word.profile {
            Some(profile) => {
                analyzed_words += 1;
                word_analysis.push(WordAnalysis {
                    word: word.raw.clone(),
                    clean_word: word.clean.clone(),
                    emotion: profile.dominant_emotion().into(),
                    confidence: profile.confidence(),
                    valence: profile.vad.valence,
                    arousal: profile.vad.arousal,
                    sentiment: profile.sentiment.polarity,
                    found: true,
                });
                if profile.confidence() > CONFIDENCE_THRESHOLD {
                    confident.push(profile);
                }
            }
            None => {
                word_analysis.push(WordAnalysis::not_found(&word.raw, word.clean.clone()));
            }
        }
    }

    if confident.is_empty() {
        return PhraseAnalysis::neutral(word_analysis, word_count, analyzed_words);
    }

    // Weighted sum: each confident word's dominant emotion is amplified, all
    // other entries contribute their raw probability.
    let mut emotions = EmotionScores::zero();
    for profile in &confident {
        let dominant = profile.dominant_emotion();
        let amplification = match profile.confidence() {
            c if c > 0.5 => 3.0,
            c if c > 0.3 => 2.5,
            _ => 2.0,
        };
        for (label, prob) in profile.emotion_probs.iter() {
            emotions[label] += if label == dominant {
                prob * amplification
            } else {
                prob
            };
        }
    }
    emotions.normalize();

    context::apply_context_boosts(&mut emotions, &text_lower);
    context::apply_intensity_modifiers(&mut emotions, &text_lower);
    emotions.normalize();

    let mut counts = EmotionCounts::default();
    for profile in &confident {
        counts[profile.dominant_emotion()] += 1;
    }
    let overall = reconcile(counts.winner(), emotions.dominant(), &counts, &emotions);
    let confidence = emotions[overall];

    let n = confident.len() as f64;
    let vad = Vad {
        valence: confident.iter().map(|p| p.vad.valence).sum::<f64>() / n,
        arousal: confident.iter().map(|p| p.vad.arousal).sum::<f64>() / n,
        dominance: confident.iter().map(|p| p.vad.dominance).sum::<f64>() / n,
    };

    let positive = confident
        .iter()
        .filter(|p| p.sentiment.polarity == SentimentPolarity::Positive)
        .count();
    let negative = confident
        .iter()
        .filter(|p| p.sentiment.polarity == SentimentPolarity::Negative)
        .count();
    let polarity = if positive > negative {
        SentimentPolarity::Positive
    } else if negative > positive {
        SentimentPolarity::Negative
    } else {
        SentimentPolarity::Neutral
    };
    let strength = confident.iter().map(|p| p.sentiment.strength).sum::<f64>() / n;

    let coverage = if word_count > 0 {
        analyzed_words as f64 / word_count as f64
    } else {
        0.0
    };

    PhraseAnalysis {
        overall_emotion: overall.into(),
        confidence,
        emotions,
        word_analysis,
        word_count,
        analyzed_words,
        coverage,
        vad,
        sentiment: Sentiment { polarity, strength },
    }
}
