//! Context-pattern boosts applied after word-level aggregation.
//!
//! Fixed keyword groups per emotion, matched by substring containment over
//! the lowercased raw input. Each matched keyword in a group adds 0.15 to
//! that emotion's running score, capped at 0.8 per emotion.

use crate::emotion::{EmotionLabel, EmotionScores};

const BOOST_PER_MATCH: f64 = 0.15;
const BOOST_CAP: f64 = 0.8;
const INTENSITY_CAP: f64 = 0.9;

const CONTEXT_PATTERNS: &[(EmotionLabel, &[&[&str]])] = &[
    (
        EmotionLabel::Anger,
        &[
            &["hate", "angry", "mad", "furious", "rage", "pissed"],
            &["damn", "shit", "fuck", "stupid", "idiot"],
            &["kill", "destroy", "break", "smash"],
        ],
    ),
    (
        EmotionLabel::Joy,
        &[
            &["love", "happy", "excited", "amazing", "wonderful", "great"],
            &["yes", "awesome", "fantastic", "perfect", "brilliant"],
            &["laugh", "smile", "fun", "celebrate", "party"],
        ],
    ),
    (
        EmotionLabel::Sadness,
        &[
            &["sad", "cry", "tears", "depressed", "miserable", "awful"],
            &["sorry", "apologize", "regret", "disappointed"],
            &["death", "died", "gone", "lost", "miss"],
        ],
    ),
    (
        EmotionLabel::Fear,
        &[
            &["scared", "afraid", "terrified", "worried", "anxious"],
            &["danger", "threat", "risk", "unsafe", "panic"],
            &["help", "emergency", "urgent", "crisis"],
        ],
    ),
    (
        EmotionLabel::Surprise,
        &[
            &["wow", "omg", "incredible", "unbelievable", "shocking"],
            &["sudden", "unexpected", "surprised", "amazed"],
            &["what", "how", "really", "seriously"],
        ],
    ),
    (
        EmotionLabel::Disgust,
        &[
            &["gross", "disgusting", "nasty", "awful", "terrible"],
            &["sick", "vomit", "puke", "yuck", "ew"],
            &["dirty", "filthy", "contaminated"],
        ],
    ),
    (
        EmotionLabel::Trust,
        &[
            &["trust", "believe", "reliable", "honest", "faithful"],
            &["friend", "loyal", "dependable", "confident"],
            &["sure", "certain", "guarantee", "promise"],
        ],
    ),
    (
        EmotionLabel::Anticipation,
        &[
            &["excited", "can't wait", "looking forward", "expecting"],
            &["soon", "coming", "about to", "ready", "prepare"],
            &["hope", "wish", "want", "need", "desire"],
        ],
    ),
];

const INTENSITY_BOOSTERS: &[&str] = &[
    "very",
    "extremely",
    "really",
    "so",
    "totally",
    "absolutely",
    "completely",
];

const INTENSITY_DAMPENERS: &[&str] = &[
    "slightly",
    "somewhat",
    "kind of",
    "sort of",
    "a bit",
    "maybe",
];

pub(crate) fn apply_context_boosts(scores: &mut EmotionScores, text_lower: &str) {
    for &(label, groups) in CONTEXT_PATTERNS {
        let mut boost = 0.0;
        for &group in groups {
            let matches = group.iter().filter(|p| text_lower.contains(*p)).count();
            boost += matches as f64 * BOOST_PER_MATCH;
        }
        if boost > 0.0 {
            tracing::debug!(emotion = label.as_str(), boost, "context boost");
            scores[label] = (scores[label] + boost).min(BOOST_CAP);
        }
    }
}

/// Intensity modifiers scale the current dominant emotion: each booster word
/// in the text adds 0.2 to the multiplier, each dampener subtracts 0.1.
pub(crate) fn apply_intensity_modifiers(scores: &mut EmotionScores, text_lower: &str) {
    let mut multiplier: f64 = 1.0;
    for booster in INTENSITY_BOOSTERS {
        if text_lower.contains(booster) {
            multiplier += 0.2;
        }
    }
    for dampener in INTENSITY_DAMPENERS {
        if text_lower.contains(dampener) {
            multiplier -= 0.1;
        }
    }

    if (multiplier - 1.0).abs() > f64::EPSILON {
        let dominant = scores.dominant();
        tracing::debug!(emotion = dominant.as_str(), multiplier, "intensity adjustment");
        scores[dominant] = (scores[dominant] * multiplier).min(INTENSITY_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anger_keywords_boost_anger() {
        let mut scores = EmotionScores::uniform();
        apply_context_boosts(&mut scores, "i hate this so much, damn it");
        // "hate" and "damn" sit in different groups; both add 0.15.
        assert!((scores[EmotionLabel::Anger] - 0.425).abs() < 1e-9);
    }

    #[test]
    fn boost_is_capped() {
        let mut scores = EmotionScores::uniform();
        apply_context_boosts(
            &mut scores,
            "hate angry mad furious rage pissed damn stupid kill destroy",
        );
        assert!((scores[EmotionLabel::Anger] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn unrelated_text_boosts_nothing() {
        let mut scores = EmotionScores::uniform();
        apply_context_boosts(&mut scores, "the quick brown fox");
        assert_eq!(scores, EmotionScores::uniform());
    }

    #[test]
    fn boosters_scale_the_dominant_emotion() {
        let mut scores = EmotionScores::uniform();
        scores[EmotionLabel::Joy] = 0.4;
        apply_intensity_modifiers(&mut scores, "i am very happy");
        assert!((scores[EmotionLabel::Joy] - 0.48).abs() < 1e-9);
    }

    #[test]
    fn dampeners_reduce_the_dominant_emotion() {
        let mut scores = EmotionScores::uniform();
        scores[EmotionLabel::Sadness] = 0.5;
        apply_intensity_modifiers(&mut scores, "i am slightly sad, maybe");
        assert!((scores[EmotionLabel::Sadness] - 0.4).abs() < 1e-9);
    }

    #[test]
    fn intensity_is_capped() {
        let mut scores = EmotionScores::uniform();
        scores[EmotionLabel::Anger] = 0.85;
        apply_intensity_modifiers(&mut scores, "absolutely completely furious");
        assert!((scores[EmotionLabel::Anger] - 0.9).abs() < 1e-9);
    }
}
