use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated activity for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub tasks_completed: u32,
    /// Seconds tracked across the day's tasks
    pub time_spent: u64,
    /// 0 to 100; 0 means "not scored" and is left out of averages
    #[serde(default)]
    pub focus_score: u8,
    /// Consecutive productive days ending at `date`, as of the last upsert
    #[serde(default)]
    pub streak_count: u32,
}

impl DailyProgress {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tasks_completed: 0,
            time_spent: 0,
            focus_score: 0,
            streak_count: 0,
        }
    }

    /// A day counts toward streaks once at least one task was completed
    pub fn is_productive(&self) -> bool {
        self.tasks_completed > 0
    }
}

/// Aggregates over a date range of daily progress rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub total_tasks: u64,
    pub total_time: u64,
    pub average_focus_score: f64,
    pub active_days: usize,
}
