//! Dominant-emotion selection with deterministic tie-breaking.

use moodlens_session_model::{EmotionSample, LabelSet};

/// The winning label of a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DominantEmotion {
    pub label: String,
    pub intensity: f64,
}

/// Pick the highest-intensity label of a sample.
///
/// Ties are broken by the session's canonical label order, never by map
/// iteration order, so repeated runs on identical input always agree.
/// Returns `None` for a sample without any intensities.
pub fn dominant_emotion(sample: &EmotionSample, labels: &LabelSet) -> Option<DominantEmotion> {
    let mut best: Option<(&str, f64)> = None;

    for (label, &intensity) in &sample.emotions {
        let better = match best {
            None => true,
            Some((best_label, best_intensity)) => {
                match intensity.total_cmp(&best_intensity) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Less => false,
                    std::cmp::Ordering::Equal => labels.rank(label) < labels.rank(best_label),
                }
            }
        };
        if better {
            best = Some((label, intensity));
        }
    }

    best.map(|(label, intensity)| DominantEmotion {
        label: label.to_string(),
        intensity,
    })
}
