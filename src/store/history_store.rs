use crate::domain::{DailyProgress, PeriodStats};
use crate::util::{date, streak, HeatLevel, HeatmapScale};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Highest storable focus score
pub const MAX_FOCUS_SCORE: u8 = 100;

/// Per-day activity rows, at most one per date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStore {
    daily_progress: Vec<DailyProgress>,
    #[serde(skip)]
    needs_save: bool,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded rows. Duplicate dates keep the last row seen.
    pub fn from_rows(rows: Vec<DailyProgress>) -> Self {
        let mut deduped: Vec<DailyProgress> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.iter_mut().find(|r| r.date == row.date) {
                Some(existing) => {
                    warn!(date = %row.date, "duplicate history row, keeping the later one");
                    *existing = row;
                }
                None => deduped.push(row),
            }
        }
        Self {
            daily_progress: deduped,
            needs_save: false,
        }
    }

    /// Re-run loaded rows through [`Self::from_rows`]
    pub fn normalized(self) -> Self {
        Self::from_rows(self.daily_progress)
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn mark_saved(&mut self) {
        self.needs_save = false;
    }

    /// Insert or update the row for `date`.
    ///
    /// A `None` focus score keeps whatever was stored (0 for a new row).
    /// Scores above 100 are capped. The row's streak count is recomputed as
    /// of `date` after the write.
    pub fn upsert(&mut self, date: NaiveDate, tasks_completed: u32, time_spent: u64, focus_score: Option<u8>) {
        let index = match self.daily_progress.iter().position(|r| r.date == date) {
            Some(index) => index,
            None => {
                self.daily_progress.push(DailyProgress::new(date));
                self.daily_progress.len() - 1
            }
        };

        {
            let row = &mut self.daily_progress[index];
            row.tasks_completed = tasks_completed;
            row.time_spent = time_spent;
            if let Some(score) = focus_score {
                row.focus_score = score.min(MAX_FOCUS_SCORE);
            }
        }

        let streak = streak::current_streak(&self.daily_progress, date);
        self.daily_progress[index].streak_count = streak;
        self.needs_save = true;

        debug!(%date, tasks_completed, time_spent, streak, "history row upserted");
    }

    pub fn all(&self) -> &[DailyProgress] {
        &self.daily_progress
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyProgress> {
        self.daily_progress.iter().find(|r| r.date == date)
    }

    /// Rows with `start <= date <= end`, ascending by date
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&DailyProgress> {
        let mut rows: Vec<&DailyProgress> = self
            .daily_progress
            .iter()
            .filter(|r| date::is_in_range(r.date, start, end))
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    pub fn current_streak_as_of(&self, today: NaiveDate) -> u32 {
        streak::current_streak(&self.daily_progress, today)
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak_as_of(date::today())
    }

    pub fn longest_streak(&self) -> u32 {
        streak::longest_streak(&self.daily_progress)
    }

    /// Refresh every stored streak count from the rows as they are now
    pub fn recompute_streaks(&mut self) {
        let streaks: Vec<u32> = self
            .daily_progress
            .iter()
            .map(|r| streak::current_streak(&self.daily_progress, r.date))
            .collect();

        let mut changed = false;
        for (row, streak) in self.daily_progress.iter_mut().zip(streaks) {
            if row.streak_count != streak {
                row.streak_count = streak;
                changed = true;
            }
        }
        if changed {
            self.needs_save = true;
        }
    }

    pub fn total_tasks_completed(&self) -> u64 {
        self.daily_progress.iter().map(|r| r.tasks_completed as u64).sum()
    }

    pub fn total_time_spent(&self) -> u64 {
        self.daily_progress.iter().map(|r| r.time_spent).sum()
    }

    /// Mean over rows with a non-zero score; 0 when none are scored
    pub fn average_focus_score(&self) -> f64 {
        average_focus(self.daily_progress.iter())
    }

    pub fn productive_days(&self) -> usize {
        self.daily_progress.iter().filter(|r| r.is_productive()).count()
    }

    /// Aggregates over the inclusive range `start..=end`
    pub fn period_stats(&self, start: NaiveDate, end: NaiveDate) -> PeriodStats {
        let rows = self.range(start, end);
        PeriodStats {
            total_tasks: rows.iter().map(|r| r.tasks_completed as u64).sum(),
            total_time: rows.iter().map(|r| r.time_spent).sum(),
            average_focus_score: average_focus(rows.iter().copied()),
            active_days: rows.iter().filter(|r| r.is_productive()).count(),
        }
    }

    /// The seven days starting at `week_start`
    pub fn weekly_stats(&self, week_start: NaiveDate) -> PeriodStats {
        self.period_stats(week_start, date::add_days(week_start, 6))
    }

    /// The calendar month. An invalid month yields empty stats.
    pub fn monthly_stats(&self, year: i32, month: u32) -> PeriodStats {
        match date::month_bounds(year, month) {
            Some((first, last)) => self.period_stats(first, last),
            None => {
                debug!(year, month, "invalid month, returning empty stats");
                PeriodStats::default()
            }
        }
    }

    pub fn heat_level(&self, date: NaiveDate, scale: &HeatmapScale) -> HeatLevel {
        scale.level(self.get(date))
    }

    /// Pair each date with its heat level; dates without a row are `None`
    pub fn heatmap_for_dates(&self, dates: &[NaiveDate], scale: &HeatmapScale) -> Vec<(NaiveDate, HeatLevel)> {
        dates
            .iter()
            .map(|d| (*d, self.heat_level(*d, scale)))
            .collect()
    }

    pub fn heatmap_for_month(&self, year: i32, month: u32, scale: &HeatmapScale) -> Vec<(NaiveDate, HeatLevel)> {
        self.heatmap_for_dates(&date::month_dates(year, month), scale)
    }
}

fn average_focus<'a>(rows: impl Iterator<Item = &'a DailyProgress>) -> f64 {
    let (sum, count) = rows
        .filter(|r| r.focus_score > 0)
        .fold((0u64, 0u64), |(sum, count), r| (sum + r.focus_score as u64, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
