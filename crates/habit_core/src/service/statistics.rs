//! Statistics Aggregator.
//!
//! # Responsibility
//! - Derive read-only summary metrics from a habit collection snapshot.
//!
//! # Invariants
//! - Pure function of the input slice; no I/O, no stored history.
//! - Empty input yields zeroed metrics, never NaN.
//! - Breakdowns list only values present, in enum declaration order.

use crate::model::habit::{Habit, HabitCategory, HabitFrequency};
use serde::Serialize;

/// Maximum number of habits listed as top performers.
pub const TOP_PERFORMER_LIMIT: usize = 5;

/// Per-category aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: HabitCategory,
    pub count: usize,
    pub completed_count: usize,
    pub summed_streak: u64,
}

impl CategoryStats {
    pub fn average_streak(&self) -> f64 {
        ratio(self.summed_streak as f64, self.count)
    }
}

/// Per-frequency share of the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyStats {
    pub frequency: HabitFrequency,
    pub count: usize,
    /// `count / total * 100`.
    pub percentage: f64,
}

/// Summary metrics for the statistics screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatistics {
    pub total_habits: usize,
    pub completed_today: usize,
    /// Percentage in `0.0..=100.0`, unrounded.
    pub completion_rate: f64,
    pub total_streak: u64,
    pub average_streak: f64,
    pub categories: Vec<CategoryStats>,
    pub frequencies: Vec<FrequencyStats>,
    /// Highest streaks first; ties keep collection order.
    pub top_performers: Vec<Habit>,
}

impl HabitStatistics {
    pub fn from_habits(habits: &[Habit]) -> Self {
        let total_habits = habits.len();
        let completed_today = habits.iter().filter(|habit| habit.completed).count();
        let total_streak = habits
            .iter()
            .map(|habit| u64::from(habit.streak))
            .sum::<u64>();

        Self {
            total_habits,
            completed_today,
            completion_rate: ratio(completed_today as f64 * 100.0, total_habits),
            total_streak,
            average_streak: ratio(total_streak as f64, total_habits),
            categories: category_breakdown(habits),
            frequencies: frequency_breakdown(habits),
            top_performers: top_performers(habits, TOP_PERFORMER_LIMIT),
        }
    }

    /// `(completed, pending)` counts for the daily completion chart.
    pub fn completion_split(&self) -> (usize, usize) {
        (
            self.completed_today,
            self.total_habits - self.completed_today,
        )
    }

    pub fn category(&self, category: HabitCategory) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|stats| stats.category == category)
    }
}

/// Habits sorted by descending streak, stable on ties, truncated to `limit`.
pub fn top_performers(habits: &[Habit], limit: usize) -> Vec<Habit> {
    let mut ranked = habits.iter().collect::<Vec<_>>();
    ranked.sort_by(|left, right| right.streak.cmp(&left.streak));
    ranked.into_iter().take(limit).cloned().collect()
}

/// Rounds to one decimal place for display.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn category_breakdown(habits: &[Habit]) -> Vec<CategoryStats> {
    HabitCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let members = habits
                .iter()
                .filter(|habit| habit.category == category)
                .collect::<Vec<_>>();
            if members.is_empty() {
                return None;
            }
            Some(CategoryStats {
                category,
                count: members.len(),
                completed_count: members.iter().filter(|habit| habit.completed).count(),
                summed_streak: members.iter().map(|habit| u64::from(habit.streak)).sum(),
            })
        })
        .collect()
}

fn frequency_breakdown(habits: &[Habit]) -> Vec<FrequencyStats> {
    let total = habits.len();
    HabitFrequency::ALL
        .into_iter()
        .filter_map(|frequency| {
            let count = habits
                .iter()
                .filter(|habit| habit.frequency == frequency)
                .count();
            (count > 0).then(|| FrequencyStats {
                frequency,
                count,
                percentage: ratio(count as f64 * 100.0, total),
            })
        })
        .collect()
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}
