use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// The fixed 8-way emotion vocabulary. The declaration order is canonical:
/// argmax ties break toward the earlier label.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Joy,
    Trust,
    Anticipation,
    Surprise,
    Anger,
    Fear,
    Sadness,
    Disgust,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Joy,
        EmotionLabel::Trust,
        EmotionLabel::Anticipation,
        EmotionLabel::Surprise,
        EmotionLabel::Anger,
        EmotionLabel::Fear,
        EmotionLabel::Sadness,
        EmotionLabel::Disgust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Joy => "joy",
            EmotionLabel::Trust => "trust",
            EmotionLabel::Anticipation => "anticipation",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Disgust => "disgust",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// An emotion label as reported to callers: one of the eight, or `neutral`
/// when no confident signal was found.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallEmotion {
    Joy,
    Trust,
    Anticipation,
    Surprise,
    Anger,
    Fear,
    Sadness,
    Disgust,
    Neutral,
}

impl From<EmotionLabel> for OverallEmotion {
    fn from(label: EmotionLabel) -> Self {
        match label {
            EmotionLabel::Joy => OverallEmotion::Joy,
            EmotionLabel::Trust => OverallEmotion::Trust,
            EmotionLabel::Anticipation => OverallEmotion::Anticipation,
            EmotionLabel::Surprise => OverallEmotion::Surprise,
            EmotionLabel::Anger => OverallEmotion::Anger,
            EmotionLabel::Fear => OverallEmotion::Fear,
            EmotionLabel::Sadness => OverallEmotion::Sadness,
            EmotionLabel::Disgust => OverallEmotion::Disgust,
        }
    }
}

/// One score per emotion label. Serialized as a JSON object keyed by the
/// lowercase label names; deserialization requires all eight keys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmotionScores([f64; 8]);

impl EmotionScores {
    pub fn zero() -> Self {
        Self([0.0; 8])
    }

    /// The degenerate profile: 0.125 per emotion.
    pub fn uniform() -> Self {
        Self([0.125; 8])
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Scale so the entries sum to 1.0. A ~zero total falls back to uniform.
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total > f64::EPSILON {
            for v in &mut self.0 {
                *v /= total;
            }
        } else {
            *self = Self::uniform();
        }
    }

    /// Highest-scoring label; ties break toward the earlier label in
    /// `EmotionLabel::ALL`.
    pub fn dominant(&self) -> EmotionLabel {
        let mut best = EmotionLabel::ALL[0];
        for &label in &EmotionLabel::ALL[1..] {
            if self[label] > self[best] {
                best = label;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f64)> + '_ {
        EmotionLabel::ALL.iter().map(move |&l| (l, self[l]))
    }
}

impl Index<EmotionLabel> for EmotionScores {
    type Output = f64;

    fn index(&self, label: EmotionLabel) -> &f64 {
        &self.0[label.index()]
    }
}

impl IndexMut<EmotionLabel> for EmotionScores {
    fn index_mut(&mut self, label: EmotionLabel) -> &mut f64 {
        &mut self.0[label.index()]
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(8))?;
        for (label, score) in self.iter() {
            map.serialize_entry(label.as_str(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<EmotionLabel, f64>::deserialize(deserializer)?;
        let mut scores = Self::zero();
        for &label in &EmotionLabel::ALL {
            match map.get(&label) {
                Some(&v) => scores[label] = v,
                None => {
                    return Err(serde::de::Error::custom(format!(
                        "missing emotion '{}'",
                        label.as_str()
                    )))
                }
            }
        }
        Ok(scores)
    }
}

/// Valence-arousal-dominance triple, each axis in [0, 1].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vad {
    pub valence: f64,
    pub arousal: f64,
    pub dominance: f64,
}

impl Vad {
    pub fn neutral() -> Self {
        Self {
            valence: 0.5,
            arousal: 0.5,
            dominance: 0.5,
        }
    }

    pub fn in_range(&self) -> bool {
        [self.valence, self.arousal, self.dominance]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentPolarity {
    Positive,
    Negative,
    Neutral,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sentiment {
    pub polarity: SentimentPolarity,
    pub strength: f64,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            polarity: SentimentPolarity::Neutral,
            strength: 0.5,
        }
    }
}

/// The emotion profile of a single word. Immutable once built, whether it
/// came from the lexicon or from the external classifier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WordProfile {
    pub emotion_probs: EmotionScores,
    pub vad: Vad,
    pub sentiment: Sentiment,
}

impl WordProfile {
    pub fn neutral() -> Self {
        Self {
            emotion_probs: EmotionScores::uniform(),
            vad: Vad::neutral(),
            sentiment: Sentiment::neutral(),
        }
    }

    pub fn dominant_emotion(&self) -> EmotionLabel {
        self.emotion_probs.dominant()
    }

    /// Per-word confidence: the dominant emotion's probability.
    pub fn confidence(&self) -> f64 {
        self.emotion_probs[self.dominant_emotion()]
    }
}

/// Per-token result row, in input order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WordAnalysis {
    pub word: String,
    pub clean_word: String,
    pub emotion: OverallEmotion,
    pub confidence: f64,
    pub valence: f64,
    pub arousal: f64,
    pub sentiment: SentimentPolarity,
    pub found: bool,
}

impl WordAnalysis {
    pub fn not_found(word: &str, clean_word: String) -> Self {
        Self {
            word: word.to_owned(),
            clean_word,
            emotion: OverallEmotion::Neutral,
            confidence: 0.125,
            valence: 0.5,
            arousal: 0.5,
            sentiment: SentimentPolarity::Neutral,
            found: false,
        }
    }
}

/// Phrase-level analysis. Derived fresh per request; never persisted.
///
/// `coverage` is `analyzed_words / word_count` where `word_count` is the
/// number of whitespace-separated tokens of the raw input and
/// `analyzed_words` is how many of them resolved to a known profile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PhraseAnalysis {
    pub overall_emotion: OverallEmotion,
    pub confidence: f64,
    pub emotions: EmotionScores,
    pub word_analysis: Vec<WordAnalysis>,
    pub word_count: usize,
    pub analyzed_words: usize,
    pub coverage: f64,
    pub vad: Vad,
    pub sentiment: Sentiment,
}

impl PhraseAnalysis {
    /// The degenerate result for a phrase with no confident words.
    pub fn neutral(word_analysis: Vec<WordAnalysis>, word_count: usize, analyzed_words: usize) -> Self {
        let coverage = if word_count > 0 {
            analyzed_words as f64 / word_count as f64
        } else {
            0.0
        };
        Self {
            overall_emotion: OverallEmotion::Neutral,
            confidence: 0.125,
            emotions: EmotionScores::uniform(),
            word_analysis,
            word_count,
            analyzed_words,
            coverage,
            vad: Vad::neutral(),
            sentiment: Sentiment::neutral(),
        }
    }
}
