use crate::discrete_system::Time;
use serde::Serialize;
use std::collections::BTreeMap;

/// Time-weighted queue-length histogram for one station.
///
/// Each call to `observe` charges the interval since the previous change to
/// the length the queue had *before* the change. The first observation only
/// plants the marker, so the accumulated durations always sum to the elapsed
/// time between the first and the last recorded change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueHistogram {
    durations: BTreeMap<usize, f64>,
    #[serde(skip)]
    last_change: Option<Time>,
}

impl QueueHistogram {
    pub fn new() -> QueueHistogram {
        QueueHistogram::default()
    }

    pub fn observe(&mut self, length: usize, now: Time) {
        if let Some(last) = self.last_change {
            *self.durations.entry(length).or_insert(0.0) += now - last;
        }

        self.last_change = Some(now);
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Total observed time, i.e. last change minus first change.
    pub fn total_time(&self) -> f64 {
        self.durations.values().sum()
    }

    /// Long-run average occupancy: sum of length x duration over total time.
    /// `None` when nothing was observed, so reports can say "no data" instead
    /// of dividing by zero.
    pub fn time_average(&self) -> Option<f64> {
        let total = self.total_time();

        if total <= 0.0 {
            return None;
        }

        let weighted: f64 = self
            .durations
            .iter()
            .map(|(length, duration)| *length as f64 * duration)
            .sum();

        Some(weighted / total)
    }

    pub fn max_length(&self) -> Option<usize> {
        self.durations.keys().next_back().cloned()
    }

    pub fn durations(&self) -> &BTreeMap<usize, f64> {
        &self.durations
    }
}

#[cfg(test)]
mod tests {
    use super::QueueHistogram;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn first_observation_records_no_duration() {
        let mut histogram = QueueHistogram::new();

        histogram.observe(0, 12.5);

        assert!(histogram.is_empty());
        assert_eq!(histogram.time_average(), None);
        assert_eq!(histogram.max_length(), None);
    }

    #[test]
    fn durations_sum_to_first_to_last_span() {
        let mut histogram = QueueHistogram::new();

        histogram.observe(0, 10.0);
        histogram.observe(1, 25.0); // held length 1 for 15
        histogram.observe(2, 30.0); // held length 2 for 5
        histogram.observe(1, 42.0); // held length 1 for 12

        assert!(close(histogram.total_time(), 32.0));
        assert_eq!(histogram.max_length(), Some(2));
    }

    #[test]
    fn time_average_weights_lengths_by_duration() {
        let mut histogram = QueueHistogram::new();

        histogram.observe(0, 0.0);
        histogram.observe(2, 10.0); // held length 2 for 10
        histogram.observe(0, 15.0); // held length 0 for 5

        assert!(close(histogram.durations()[&2], 10.0));
        assert!(close(histogram.durations()[&0], 5.0));

        // (2 * 10 + 0 * 5) / 15
        assert!(close(histogram.time_average().unwrap(), 20.0 / 15.0));
    }

    #[test]
    fn repeated_lengths_accumulate() {
        let mut histogram = QueueHistogram::new();

        histogram.observe(1, 0.0);
        histogram.observe(1, 3.0);
        histogram.observe(1, 8.0);

        assert!(close(histogram.durations()[&1], 8.0));
    }
}
