//! Periodic qualitative insights over recent samples.

use std::collections::BTreeMap;

use moodlens_session_model::{EmotionSample, LabelSet};

use crate::dominant::dominant_emotion;
use crate::history::RollingHistory;
use crate::stats::variance;

/// Generates qualitative statements about recent emotional patterns.
///
/// Runs on its own cycle, independent of sample arrival. Each run fully
/// replaces the previous insight list; a gated run (disabled, or too
/// little history) produces nothing and leaves the previous list standing.
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    /// Number of most-recent samples examined per cycle.
    pub window: usize,

    /// Minimum history length before any insight is generated.
    pub min_history: usize,

    /// Primary-label variance above this emits a volatility warning.
    pub volatility_threshold: f64,

    /// Half-to-half mean shift beyond this emits a trend insight.
    pub trend_threshold: f64,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self {
            window: 20,
            min_history: 10,
            volatility_threshold: 0.1,
            trend_threshold: 0.1,
        }
    }
}

impl InsightGenerator {
    /// Run one insight cycle. Returns `None` when gated.
    pub fn generate(
        &self,
        history: &RollingHistory,
        labels: &LabelSet,
        enabled: bool,
    ) -> Option<Vec<String>> {
        if !enabled || history.len() < self.min_history {
            return None;
        }

        let recent = history.recent(self.window);
        let mut insights = Vec::new();

        if let Some(frequent) = self.most_frequent_dominant(&recent, labels) {
            insights.push(format!("Dominant emotion recently: {frequent}"));
        }

        if let Some(primary) = labels.primary() {
            let values: Vec<f64> = recent.iter().map(|s| s.intensity(primary)).collect();

            if variance(&values) > self.volatility_threshold {
                insights.push(format!(
                    "High volatility detected in {primary} readings"
                ));
            }

            match self.half_window_shift(&values) {
                Some(shift) if shift > self.trend_threshold => {
                    insights.push(format!("{primary} has been trending upward"));
                }
                Some(shift) if shift < -self.trend_threshold => {
                    insights.push(format!("{primary} has been trending downward"));
                }
                _ => {}
            }
        }

        Some(insights)
    }

    /// Tally per-sample dominant labels and return the most frequent,
    /// breaking count ties by canonical label order.
    fn most_frequent_dominant(
        &self,
        recent: &[&EmotionSample],
        labels: &LabelSet,
    ) -> Option<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for sample in recent {
            if let Some(dominant) = dominant_emotion(sample, labels) {
                *counts.entry(dominant.label).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .min_by(|(label_a, count_a), (label_b, count_b)| {
                count_b
                    .cmp(count_a)
                    .then_with(|| labels.rank(label_a).cmp(&labels.rank(label_b)))
            })
            .map(|(label, _)| label)
    }

    /// Mean of the second half minus mean of the first half.
    /// `None` when either half would be empty.
    fn half_window_shift(&self, values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let mid = values.len() / 2;
        let (first, second) = values.split_at(mid);
        let first_mean = first.iter().sum::<f64>() / first.len() as f64;
        let second_mean = second.iter().sum::<f64>() / second.len() as f64;
        Some(second_mean - first_mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::new(["joy", "surprise", "anger", "sadness", "neutral"])
    }

    fn history_from(joy_values: &[f64]) -> RollingHistory {
        let mut history = RollingHistory::new(200);
        for (i, &joy) in joy_values.iter().enumerate() {
            history.push(EmotionSample::new(
                i as i64 * 1_000,
                [("joy", joy), ("neutral", 0.05)],
                0.95,
            ));
        }
        history
    }

    #[test]
    fn test_gated_when_disabled() {
        let history = history_from(&[0.5; 30]);
        let generator = InsightGenerator::default();
        assert!(generator.generate(&history, &labels(), false).is_none());
    }

    #[test]
    fn test_gated_below_min_history() {
        let history = history_from(&[0.5; 9]);
        let generator = InsightGenerator::default();
        assert!(generator.generate(&history, &labels(), true).is_none());
    }

    #[test]
    fn test_frequency_reports_most_common_dominant() {
        let history = history_from(&[0.8; 15]);
        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(insights.iter().any(|s| s.contains("Dominant emotion recently: joy")));
    }

    #[test]
    fn test_rising_primary_emits_upward_trend() {
        // joy ramps from 0.1 toward 0.9 over ten samples, then holds at
        // 0.9. Within the 20-sample window the first half averages 0.78
        // and the second half 0.9, a shift above the 0.1 threshold.
        let mut values: Vec<f64> = (0..10).map(|i| 0.1 + 0.08 * i as f64).collect();
        values.extend(std::iter::repeat(0.9).take(15));
        let history = history_from(&values);

        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(insights.iter().any(|s| s.contains("trending upward")));
        assert!(!insights.iter().any(|s| s.contains("trending downward")));
    }

    #[test]
    fn test_falling_primary_emits_downward_trend() {
        let values: Vec<f64> = (0..20).map(|i| 0.9 - i as f64 * 0.04).collect();
        let history = history_from(&values);

        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(insights.iter().any(|s| s.contains("trending downward")));
    }

    #[test]
    fn test_flat_primary_emits_no_trend() {
        let history = history_from(&[0.5; 25]);
        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(!insights.iter().any(|s| s.contains("trending")));
    }

    #[test]
    fn test_volatile_primary_emits_warning() {
        // Alternating extremes: variance 0.25 > 0.1.
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 0.0 } else { 1.0 }).collect();
        let history = history_from(&values);

        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(insights.iter().any(|s| s.contains("volatility")));
    }

    #[test]
    fn test_stable_primary_emits_no_volatility_warning() {
        let history = history_from(&[0.5; 20]);
        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(!insights.iter().any(|s| s.contains("volatility")));
    }

    #[test]
    fn test_only_recent_window_is_examined() {
        // 30 samples of low joy followed by 20 high: the 20-sample window
        // sees only the high plateau, so no trend fires.
        let mut values = vec![0.1; 30];
        values.extend(std::iter::repeat(0.9).take(20));
        let history = history_from(&values);

        let generator = InsightGenerator::default();
        let insights = generator.generate(&history, &labels(), true).unwrap();
        assert!(!insights.iter().any(|s| s.contains("trending")));
    }
}
