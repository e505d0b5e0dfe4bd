//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `habit_core` linkage without the Flutter runtime.
//! - Print a statistics summary for a data directory, read-only.
//!
//! Usage: `habit_cli [DATA_DIR]`

use habit_core::{round_one_decimal, FileSlotStore, HabitStore};

fn main() {
    println!("habit_core ping={}", habit_core::ping());
    println!("habit_core version={}", habit_core::core_version());

    let Some(data_dir) = std::env::args().nth(1) else {
        return;
    };

    let store = HabitStore::load(Box::new(FileSlotStore::new(data_dir)));
    let stats = store.statistics();
    println!("habits total={} completed={}", stats.total_habits, stats.completed_today);
    println!(
        "completion_rate={}% total_streak={} average_streak={}",
        round_one_decimal(stats.completion_rate),
        stats.total_streak,
        round_one_decimal(stats.average_streak)
    );
    for entry in &stats.categories {
        println!(
            "category={} count={} completed={} average_streak={}",
            entry.category.as_str(),
            entry.count,
            entry.completed_count,
            round_one_decimal(entry.average_streak())
        );
    }
    for entry in &stats.frequencies {
        println!(
            "frequency={} count={} share={}%",
            entry.frequency.as_str(),
            entry.count,
            round_one_decimal(entry.percentage)
        );
    }
    for (rank, habit) in stats.top_performers.iter().enumerate() {
        println!("top{}={} streak={}", rank + 1, habit.id, habit.streak);
    }
}
