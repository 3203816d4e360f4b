//! Derived session statistics.
//!
//! Statistics are a pure function of the rolling history: no incremental
//! accumulators, no hidden state. The buffer is small (a few hundred
//! samples) so the full pass per accepted sample is cheap and trivially
//! matches the reference recompute.

use moodlens_session_model::{EmotionSample, LabelSet, LabelStatistics, SessionStatistics};

/// Confidence above which a sample counts as a peak.
pub const PEAK_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Recompute statistics for every declared label from the current buffer.
///
/// `average` is 0 for an empty buffer; `trend` is 0 with fewer than two
/// samples, otherwise the last value minus the second-to-last.
pub fn derive_statistics(samples: &[&EmotionSample], labels: &LabelSet) -> SessionStatistics {
    let mut stats = SessionStatistics {
        sample_count: samples.len(),
        ..Default::default()
    };

    for label in labels.labels() {
        stats
            .labels
            .insert(label.clone(), derive_label(samples, label));
    }

    if !samples.is_empty() {
        stats.average_confidence =
            samples.iter().map(|s| s.confidence).sum::<f64>() / samples.len() as f64;
        stats.peak_count = samples
            .iter()
            .filter(|s| s.confidence > PEAK_CONFIDENCE_THRESHOLD)
            .count();
    }

    stats
}

fn derive_label(samples: &[&EmotionSample], label: &str) -> LabelStatistics {
    if samples.is_empty() {
        return LabelStatistics::default();
    }

    let values: Vec<f64> = samples.iter().map(|s| s.intensity(label)).collect();
    let average = values.iter().sum::<f64>() / values.len() as f64;
    let maximum = values.iter().copied().fold(0.0_f64, f64::max);
    let trend = match values.len() {
        0 | 1 => 0.0,
        n => values[n - 1] - values[n - 2],
    };

    LabelStatistics {
        average,
        maximum,
        trend,
    }
}

/// Population variance of a value sequence. 0 for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}
