use crate::domain::{GoalType, PeriodStats, Settings};
use crate::store::{GoalStore, HistoryStore, TaskStore};
use crate::util::date;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Planned work for a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayStats {
    pub planned: usize,
    pub completed: usize,
    pub time_spent: u64,
    /// Sum of estimates over tasks that carry one
    pub estimated: u64,
    pub over_cap: bool,
}

/// Per-tag totals over one day's tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagStats {
    pub task_count: usize,
    pub done_count: usize,
    pub time_spent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgressRow {
    pub id: Uuid,
    pub title: String,
    pub goal_type: GoalType,
    pub current: f64,
    pub target: f64,
    pub unit: Option<String>,
    pub percent: f64,
    pub days_remaining: i64,
}

/// Everything the report shows, computed once from the stores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub date: NaiveDate,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_tasks_completed: u64,
    pub total_time_spent: u64,
    pub average_focus_score: f64,
    pub productive_days: usize,
    pub week_start: NaiveDate,
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub overdue_goals: usize,
    pub overdue_tasks: usize,
    pub daily_cap: u32,
    pub day: DayStats,
    pub tags: BTreeMap<String, TagStats>,
    pub goal_progress: Vec<GoalProgressRow>,
}

impl AnalyticsSnapshot {
    /// Gather analytics as of `today`. The week boundary and daily cap come
    /// from `settings`.
    pub fn collect(
        tasks: &TaskStore,
        goals: &GoalStore,
        history: &HistoryStore,
        settings: &Settings,
        today: NaiveDate,
    ) -> Self {
        let week_start = date::start_of_week(today, settings.week_starts_on);

        let goal_progress = goals
            .active_as_of(today)
            .into_iter()
            .map(|goal| GoalProgressRow {
                id: goal.id,
                title: goal.title.clone(),
                goal_type: goal.goal_type,
                current: goal.current,
                target: goal.target,
                unit: goal.unit.clone(),
                percent: goal.completion_percentage(),
                days_remaining: goal.days_remaining(today),
            })
            .collect();

        Self {
            date: today,
            current_streak: history.current_streak_as_of(today),
            longest_streak: history.longest_streak(),
            total_tasks_completed: history.total_tasks_completed(),
            total_time_spent: history.total_time_spent(),
            average_focus_score: history.average_focus_score(),
            productive_days: history.productive_days(),
            week_start,
            week: history.weekly_stats(week_start),
            month: history.monthly_stats(today.year(), today.month()),
            active_goals: goals.active_as_of(today).len(),
            completed_goals: goals.completed().len(),
            overdue_goals: goals.overdue_as_of(today).len(),
            overdue_tasks: tasks.overdue_as_of(today).len(),
            daily_cap: settings.max_daily_tasks,
            day: calculate_day_stats(tasks, today, settings.max_daily_tasks),
            tags: calculate_tag_stats(tasks, today),
            goal_progress,
        }
    }

    /// Completed share of the day's planned tasks, 0 to 100
    pub fn day_completion_percent(&self) -> f64 {
        if self.day.planned == 0 {
            0.0
        } else {
            self.day.completed as f64 / self.day.planned as f64 * 100.0
        }
    }
}

/// Planned, completed and tracked totals for `day`
pub fn calculate_day_stats(tasks: &TaskStore, day: NaiveDate, cap: u32) -> DayStats {
    let day_tasks = tasks.by_date(day);

    DayStats {
        planned: day_tasks.len(),
        completed: day_tasks.iter().filter(|t| t.is_completed()).count(),
        time_spent: day_tasks.iter().map(|t| t.time_spent).sum(),
        estimated: day_tasks.iter().filter_map(|t| t.estimated_time).sum(),
        over_cap: day_tasks.len() > cap as usize,
    }
}

/// Tag totals over the tasks planned for `day`
pub fn calculate_tag_stats(tasks: &TaskStore, day: NaiveDate) -> BTreeMap<String, TagStats> {
    let mut tag_map: BTreeMap<String, TagStats> = BTreeMap::new();

    for task in tasks.by_date(day) {
        for tag in &task.tags {
            let entry = tag_map.entry(tag.clone()).or_default();
            entry.task_count += 1;
            entry.time_spent += task.time_spent;
            if task.is_completed() {
                entry.done_count += 1;
            }
        }
    }

    tag_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination;
    use crate::domain::{GoalDraft, GoalTimeframe, TaskDraft, TaskStatus, WeekStart};
    use crate::util::date::parse_day;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_collect() {
        let today = day("2024-03-06");
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let mut history = HistoryStore::new();

        let goal_id = goals.add(
            GoalDraft::new("Write", GoalType::Effort, GoalTimeframe::Monthly, day("2024-03-01"), 7200.0)
                .with_end_date(day("2024-03-31")),
        );
        goals.add(
            GoalDraft::new("Old", GoalType::Quantity, GoalTimeframe::Weekly, day("2024-02-01"), 5.0)
                .with_end_date(day("2024-02-07")),
        );

        let essay = tasks.add(
            TaskDraft::new("Essay", today)
                .with_goal(goal_id)
                .with_tag("writing")
                .with_estimate(3600),
        );
        tasks.add(TaskDraft::new("Outline", today).with_tag("writing"));
        tasks.add(TaskDraft::new("Forgotten", day("2024-03-04")));
        tasks.add_time(essay, 1800).unwrap();
        coordination::complete_task_and_apply_goal_progress(&mut tasks, &mut goals, essay).unwrap();

        history.upsert(day("2024-03-04"), 2, 600, Some(40));
        history.upsert(day("2024-03-05"), 1, 300, None);
        coordination::refresh_today_progress(&tasks, &mut history, today);

        let settings = Settings {
            week_starts_on: WeekStart::Monday,
            max_daily_tasks: 1,
            ..Settings::default()
        };
        let snapshot = AnalyticsSnapshot::collect(&tasks, &goals, &history, &settings, today);

        assert_eq!(snapshot.current_streak, 3);
        assert_eq!(snapshot.longest_streak, 3);
        assert_eq!(snapshot.total_tasks_completed, 4);
        assert_eq!(snapshot.week_start, day("2024-03-04"));
        assert_eq!(snapshot.week.active_days, 3);
        assert_eq!(snapshot.month.total_time, 2700);
        assert_eq!(snapshot.active_goals, 1);
        assert_eq!(snapshot.overdue_goals, 1);
        assert_eq!(snapshot.overdue_tasks, 1);
        assert_eq!(
            snapshot.day,
            DayStats {
                planned: 2,
                completed: 1,
                time_spent: 1800,
                estimated: 3600,
                over_cap: true,
            }
        );
        assert_eq!(snapshot.day_completion_percent(), 50.0);
        assert_eq!(
            snapshot.tags["writing"],
            TagStats {
                task_count: 2,
                done_count: 1,
                time_spent: 1800,
            }
        );
        assert_eq!(snapshot.goal_progress.len(), 1);
        assert_eq!(snapshot.goal_progress[0].percent, 25.0);
        assert_eq!(snapshot.goal_progress[0].days_remaining, 25);
    }

    #[test]
    fn test_empty_stores() {
        let snapshot = AnalyticsSnapshot::collect(
            &TaskStore::new(),
            &GoalStore::new(),
            &HistoryStore::new(),
            &Settings::default(),
            day("2024-03-06"),
        );
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.day, DayStats::default());
        assert_eq!(snapshot.day_completion_percent(), 0.0);
        assert!(snapshot.tags.is_empty());
    }

    #[test]
    fn test_tag_stats_only_count_the_day() {
        let mut tasks = TaskStore::new();
        let a = tasks.add(TaskDraft::new("a", day("2024-03-06")).with_tag("x"));
        tasks.add(TaskDraft::new("b", day("2024-03-07")).with_tag("x"));
        tasks.set_status(a, TaskStatus::Completed);

        let tags = calculate_tag_stats(&tasks, day("2024-03-06"));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["x"].task_count, 1);
        assert_eq!(tags["x"].done_count, 1);
    }
}
