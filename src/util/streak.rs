use crate::domain::DailyProgress;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

fn productive_dates(rows: &[DailyProgress]) -> BTreeSet<NaiveDate> {
    rows.iter()
        .filter(|row| row.is_productive())
        .map(|row| row.date)
        .collect()
}

/// Consecutive productive days ending at `today`.
///
/// Walks backward one day at a time starting at `today` and stops at the
/// first day without a productive row, so a day with no completions yet
/// yields 0.
pub fn current_streak(rows: &[DailyProgress], today: NaiveDate) -> u32 {
    let dates = productive_dates(rows);
    let mut streak = 0;
    let mut cursor = today;

    while dates.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }

    streak
}

/// Longest run of consecutive productive days anywhere in the history
pub fn longest_streak(rows: &[DailyProgress]) -> u32 {
    let mut longest = 0;
    let mut running = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in productive_dates(rows) {
        running = match previous {
            Some(prev) if (date - prev).num_days() == 1 => running + 1,
            _ => 1,
        };
        longest = longest.max(running);
        previous = Some(date);
    }

    longest
}
