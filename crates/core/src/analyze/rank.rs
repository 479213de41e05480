//! Reconciliation between the two ranking methods: most-frequent dominant
//! emotion among confident words, and the probability-weighted aggregate.

use crate::emotion::{EmotionLabel, EmotionScores};
use std::ops::{Index, IndexMut};

/// How far the probability winner may sit above the count winner before the
/// count vote is overruled.
const PROBABILITY_GAP: f64 = 0.05;

/// Confident-word votes per emotion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmotionCounts([usize; 8]);

impl EmotionCounts {
    /// Highest vote count; ties break toward the earlier label.
    pub fn winner(&self) -> EmotionLabel {
        let mut best = EmotionLabel::ALL[0];
        for &label in &EmotionLabel::ALL[1..] {
            if self[label] > self[best] {
                best = label;
            }
        }
        best
    }

    fn is_tied(&self, winner: EmotionLabel) -> bool {
        EmotionLabel::ALL
            .iter()
            .any(|&l| l != winner && self[l] == self[winner])
    }
}

impl Index<EmotionLabel> for EmotionCounts {
    type Output = usize;

    fn index(&self, label: EmotionLabel) -> &usize {
        &self.0[label as usize]
    }
}

impl IndexMut<EmotionLabel> for EmotionCounts {
    fn index_mut(&mut self, label: EmotionLabel) -> &mut usize {
        &mut self.0[label as usize]
    }
}

/// Pick the overall emotion. The count winner stands only when its vote is
/// unambiguous and the probability winner does not lead it by more than
/// [`PROBABILITY_GAP`] in the aggregate scores.
pub fn reconcile(
    count_winner: EmotionLabel,
    probability_winner: EmotionLabel,
    counts: &EmotionCounts,
    emotions: &EmotionScores,
) -> EmotionLabel {
    if counts.is_tied(count_winner) {
        return probability_winner;
    }
    if emotions[probability_winner] - emotions[count_winner] > PROBABILITY_GAP {
        return probability_winner;
    }
    count_winner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(EmotionLabel, f64)]) -> EmotionScores {
        let mut s = EmotionScores::zero();
        for &(l, v) in pairs {
            s[l] = v;
        }
        s
    }

    #[test]
    fn count_winner_stands_when_unambiguous_and_close() {
        let mut counts = EmotionCounts::default();
        counts[EmotionLabel::Joy] = 3;
        counts[EmotionLabel::Anger] = 1;
        let emotions = scores(&[(EmotionLabel::Joy, 0.40), (EmotionLabel::Anger, 0.42)]);

        let overall = reconcile(EmotionLabel::Joy, EmotionLabel::Anger, &counts, &emotions);
        assert_eq!(overall, EmotionLabel::Joy);
    }

    #[test]
    fn tied_counts_defer_to_probability() {
        let mut counts = EmotionCounts::default();
        counts[EmotionLabel::Joy] = 2;
        counts[EmotionLabel::Sadness] = 2;
        let emotions = scores(&[(EmotionLabel::Joy, 0.3), (EmotionLabel::Sadness, 0.32)]);

        let overall = reconcile(EmotionLabel::Joy, EmotionLabel::Sadness, &counts, &emotions);
        assert_eq!(overall, EmotionLabel::Sadness);
    }

    #[test]
    fn large_probability_gap_overrules_counts() {
        let mut counts = EmotionCounts::default();
        counts[EmotionLabel::Trust] = 3;
        counts[EmotionLabel::Fear] = 1;
        let emotions = scores(&[(EmotionLabel::Trust, 0.30), (EmotionLabel::Fear, 0.45)]);

        let overall = reconcile(EmotionLabel::Trust, EmotionLabel::Fear, &counts, &emotions);
        assert_eq!(overall, EmotionLabel::Fear);
    }

    #[test]
    fn small_probability_gap_keeps_count_winner() {
        let mut counts = EmotionCounts::default();
        counts[EmotionLabel::Trust] = 3;
        counts[EmotionLabel::Fear] = 1;
        let emotions = scores(&[(EmotionLabel::Trust, 0.40), (EmotionLabel::Fear, 0.44)]);

        let overall = reconcile(EmotionLabel::Trust, EmotionLabel::Fear, &counts, &emotions);
        assert_eq!(overall, EmotionLabel::Trust);
    }

    #[test]
    fn winner_breaks_ties_in_enum_order() {
        let mut counts = EmotionCounts::default();
        counts[EmotionLabel::Fear] = 2;
        counts[EmotionLabel::Trust] = 2;
        assert_eq!(counts.winner(), EmotionLabel::Trust);
    }
}
