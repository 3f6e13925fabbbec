use crate::history::SessionSummary;
use crate::models::{Difficulty, Letter, Question};
use std::collections::BTreeMap;

/// Performance counters accumulated over every session of this process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    pub total_answered: u32,
    pub correct_answered: u32,
    pub average_time_per_question: f64,
    pub difficulty_counts: BTreeMap<Difficulty, u32>,
    pub current_streak: u32,
    pub best_streak: u32,
    pub history: Vec<SessionSummary>,
}

#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: AggregateStats,
}

impl StatsTracker {
    pub fn new() -> Self {
        let mut stats = AggregateStats::default();
        for difficulty in Difficulty::all() {
            stats.difficulty_counts.insert(difficulty, 0);
        }
        Self { stats }
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Folds one answer into the aggregates and reports whether it was correct.
    pub fn record_answer(
        &mut self,
        selected: Letter,
        question: &Question,
        elapsed_secs: f64,
        difficulty: Difficulty,
    ) -> bool {
        let s = &mut self.stats;
        s.total_answered += 1;

        // running mean, evaluated in this order so the floats match a naive fold
        let total = s.total_answered as f64;
        s.average_time_per_question =
            (s.average_time_per_question * (total - 1.0) + elapsed_secs.max(0.0)) / total;

        let correct = question.is_correct(selected);
        if correct {
            s.correct_answered += 1;
            s.current_streak += 1;
            s.best_streak = s.best_streak.max(s.current_streak);
        } else {
            s.current_streak = 0;
        }

        *s.difficulty_counts.entry(difficulty).or_insert(0) += 1;
        correct
    }

    pub fn accuracy_percent(&self) -> f64 {
        if self.stats.total_answered == 0 {
            return 0.0;
        }
        100.0 * self.stats.correct_answered as f64 / self.stats.total_answered as f64
    }

    pub fn record_session(&mut self, summary: SessionSummary) {
        self.stats.history.push(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: Letter) -> Question {
        Question {
            prompt: "q".to_string(),
            options: Letter::ALL.iter().map(|l| (*l, l.to_string())).collect(),
            correct,
        }
    }

    #[test]
    fn test_accuracy_is_zero_without_answers() {
        let tracker = StatsTracker::new();
        assert_eq!(tracker.accuracy_percent(), 0.0);
        assert_eq!(tracker.stats().difficulty_counts.len(), 3);
    }

    #[test]
    fn test_accuracy_percent() {
        let mut tracker = StatsTracker::new();
        let q = question(Letter::B);
        tracker.record_answer(Letter::B, &q, 1.0, Difficulty::Easy);
        tracker.record_answer(Letter::A, &q, 1.0, Difficulty::Easy);
        tracker.record_answer(Letter::B, &q, 1.0, Difficulty::Easy);
        tracker.record_answer(Letter::B, &q, 1.0, Difficulty::Easy);

        let s = tracker.stats();
        assert_eq!(s.total_answered, 4);
        assert_eq!(s.correct_answered, 3);
        assert!((tracker.accuracy_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_time_is_arithmetic_mean() {
        let mut tracker = StatsTracker::new();
        let q = question(Letter::A);
        let times = [1.5, 0.25, 7.0, 3.125, 12.75, 0.0, 4.2];

        for (k, t) in times.iter().enumerate() {
            tracker.record_answer(Letter::C, &q, *t, Difficulty::Medium);
            let mean = times[..=k].iter().sum::<f64>() / (k + 1) as f64;
            assert!((tracker.stats().average_time_per_question - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_streaks() {
        let mut tracker = StatsTracker::new();
        let q = question(Letter::D);
        let answers = [Letter::D, Letter::D, Letter::D, Letter::A, Letter::D, Letter::D];
        let mut best_seen = 0;

        for letter in answers {
            tracker.record_answer(letter, &q, 1.0, Difficulty::Hard);
            let s = tracker.stats();
            assert!(s.best_streak >= s.current_streak);
            assert!(s.best_streak >= best_seen);
            assert!(s.correct_answered <= s.total_answered);
            best_seen = s.best_streak;
        }

        let s = tracker.stats();
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.best_streak, 3);
    }

    #[test]
    fn test_difficulty_distribution() {
        let mut tracker = StatsTracker::new();
        let q = question(Letter::A);
        tracker.record_answer(Letter::A, &q, 1.0, Difficulty::Easy);
        tracker.record_answer(Letter::A, &q, 1.0, Difficulty::Hard);
        tracker.record_answer(Letter::B, &q, 1.0, Difficulty::Hard);

        let counts = &tracker.stats().difficulty_counts;
        assert_eq!(counts[&Difficulty::Easy], 1);
        assert_eq!(counts[&Difficulty::Medium], 0);
        assert_eq!(counts[&Difficulty::Hard], 2);
    }

    #[test]
    fn test_record_answer_reports_correctness() {
        let mut tracker = StatsTracker::new();
        let q = question(Letter::C);
        assert!(tracker.record_answer(Letter::C, &q, 0.5, Difficulty::Easy));
        assert!(!tracker.record_answer(Letter::A, &q, 0.5, Difficulty::Easy));
    }
}
