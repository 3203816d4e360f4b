//! Bounded rolling history of accepted samples.

use std::collections::VecDeque;

use moodlens_session_model::EmotionSample;

/// Bounded FIFO of accepted classification samples.
///
/// All derived statistics are recomputed from this buffer, so it is owned
/// exclusively by the session controller and mutated only through the
/// validated-sample path. `clear` exists for the user-triggered reset and
/// is never implied by stopping the stream.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    samples: VecDeque<EmotionSample>,
    capacity: usize,
}

impl RollingHistory {
    /// Create an empty history holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1_024)),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: EmotionSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &EmotionSample> {
        self.samples.iter()
    }

    /// Read-only ordered snapshot, oldest-first.
    pub fn snapshot(&self) -> Vec<EmotionSample> {
        self.samples.iter().cloned().collect()
    }

    /// The most recent `count` samples, oldest-first.
    pub fn recent(&self, count: usize) -> Vec<&EmotionSample> {
        let skip = self.samples.len().saturating_sub(count);
        self.samples.iter().skip(skip).collect()
    }

    /// Oldest retained sample.
    pub fn front(&self) -> Option<&EmotionSample> {
        self.samples.front()
    }

    /// Most recent sample.
    pub fn back(&self) -> Option<&EmotionSample> {
        self.samples.back()
    }

    /// Drop every sample. User-triggered reset only.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(timestamp_ms: i64, joy: f64) -> EmotionSample {
        EmotionSample::new(timestamp_ms, [("joy", joy)], 0.9)
    }

    #[test]
    fn test_push_within_capacity() {
        let mut history = RollingHistory::new(3);
        history.push(sample(0, 0.1));
        history.push(sample(1, 0.2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.front().unwrap().timestamp_ms, 0);
    }

    #[test]
    fn test_overflow_evicts_oldest_first() {
        let mut history = RollingHistory::new(3);
        for i in 0..5 {
            history.push(sample(i, 0.1));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.front().unwrap().timestamp_ms, 2);
        assert_eq!(history.back().unwrap().timestamp_ms, 4);
    }

    #[test]
    fn test_capacity_100_feed_150_head_is_51st() {
        let mut history = RollingHistory::new(100);
        for i in 0..150 {
            history.push(sample(i, 0.5));
        }
        assert_eq!(history.len(), 100);
        // The 51st inserted sample carries timestamp 50.
        assert_eq!(history.front().unwrap().timestamp_ms, 50);
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut history = RollingHistory::new(10);
        history.push(sample(0, 0.3));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 10);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut history = RollingHistory::new(10);
        for i in 0..6 {
            history.push(sample(i, 0.1));
        }
        let recent: Vec<i64> = history.recent(3).iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(recent, vec![3, 4, 5]);
    }

    #[test]
    fn test_snapshot_is_ordered_copy() {
        let mut history = RollingHistory::new(4);
        for i in 0..4 {
            history.push(sample(i, 0.2));
        }
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 1usize..64,
            pushes in 0usize..200,
        ) {
            let mut history = RollingHistory::new(capacity);
            for i in 0..pushes {
                history.push(sample(i as i64, 0.5));
            }
            prop_assert!(history.len() <= capacity);
            prop_assert_eq!(history.len(), pushes.min(capacity));
        }

        #[test]
        fn prop_contents_are_last_capacity_pushes(
            capacity in 1usize..32,
            pushes in 1usize..100,
        ) {
            let mut history = RollingHistory::new(capacity);
            for i in 0..pushes {
                history.push(sample(i as i64, 0.5));
            }
            let expected_start = pushes.saturating_sub(capacity) as i64;
            let timestamps: Vec<i64> =
                history.iter().map(|s| s.timestamp_ms).collect();
            let expected: Vec<i64> = (expected_start..pushes as i64).collect();
            prop_assert_eq!(timestamps, expected);
        }
    }
}
