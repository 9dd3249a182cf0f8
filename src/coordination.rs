//! Rules that span more than one store.
//!
//! Stores never reach into each other. Every effect that crosses a store
//! boundary goes through one of these functions, which take the stores they
//! touch as explicit arguments.

use crate::domain::{GoalType, TaskStatus};
use crate::error::CoordinationError;
use crate::store::{ActiveSessionPolicy, GoalStore, HistoryStore, StoppedSession, TaskStore, TimerStore};
use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

/// Mark a task completed and credit its goal.
///
/// Effort goals receive the task's tracked seconds, quantity goals one unit.
/// Hybrid goals have no implied amount and are refused with
/// [`CoordinationError::HybridProgressRequired`] before anything changes; use
/// [`complete_task_with_goal_amount`] for those.
///
/// Returns `Ok(false)` when the task does not exist or was already completed,
/// in which case no goal is touched.
pub fn complete_task_and_apply_goal_progress(
    tasks: &mut TaskStore,
    goals: &mut GoalStore,
    task_id: Uuid,
) -> Result<bool, CoordinationError> {
    let Some(task) = tasks.get(task_id) else {
        return Ok(false);
    };
    if task.is_completed() {
        return Ok(false);
    }

    let amount = match task.goal_id.and_then(|goal_id| goals.get(goal_id)) {
        Some(goal) => match goal.goal_type {
            GoalType::Effort => Some(task.time_spent as f64),
            GoalType::Quantity => Some(1.0),
            GoalType::Hybrid => {
                return Err(CoordinationError::HybridProgressRequired { goal_id: goal.id });
            }
        },
        None => None,
    };

    Ok(finish_task(tasks, goals, task_id, amount))
}

/// Mark a task completed and credit its goal with `amount`, whatever the
/// goal type. Same return contract as [`complete_task_and_apply_goal_progress`].
pub fn complete_task_with_goal_amount(
    tasks: &mut TaskStore,
    goals: &mut GoalStore,
    task_id: Uuid,
    amount: f64,
) -> Result<bool, CoordinationError> {
    match tasks.get(task_id) {
        Some(task) if !task.is_completed() => Ok(finish_task(tasks, goals, task_id, Some(amount))),
        _ => Ok(false),
    }
}

fn finish_task(tasks: &mut TaskStore, goals: &mut GoalStore, task_id: Uuid, amount: Option<f64>) -> bool {
    let goal_id = tasks.get(task_id).and_then(|t| t.goal_id);
    if !tasks.set_status(task_id, TaskStatus::Completed) {
        return false;
    }

    match (goal_id, amount) {
        (Some(goal_id), Some(amount)) if goals.adjust_progress(goal_id, amount) => {
            info!(%task_id, %goal_id, amount, "task completed, goal credited");
        }
        (Some(goal_id), _) => {
            warn!(%task_id, %goal_id, "task references a missing goal, no progress applied");
        }
        (None, _) => {
            info!(%task_id, "task completed");
        }
    }
    true
}

pub fn stop_timer_and_commit(
    timer: &mut TimerStore,
    tasks: &mut TaskStore,
) -> Result<Option<StoppedSession>, CoordinationError> {
    stop_timer_and_commit_at(timer, tasks, Local::now())
}

/// Stop the timer and add the elapsed seconds to the timed task
pub fn stop_timer_and_commit_at(
    timer: &mut TimerStore,
    tasks: &mut TaskStore,
    now: DateTime<Local>,
) -> Result<Option<StoppedSession>, CoordinationError> {
    let stopped = timer.stop_at(now);
    if let Some(session) = stopped {
        commit(tasks, session)?;
    }
    Ok(stopped)
}

pub fn switch_timer(
    timer: &mut TimerStore,
    tasks: &mut TaskStore,
    task_id: Uuid,
) -> Result<Option<StoppedSession>, CoordinationError> {
    switch_timer_at(timer, tasks, task_id, Local::now())
}

/// Start timing `task_id`, stopping and committing whatever was running
pub fn switch_timer_at(
    timer: &mut TimerStore,
    tasks: &mut TaskStore,
    task_id: Uuid,
    now: DateTime<Local>,
) -> Result<Option<StoppedSession>, CoordinationError> {
    let previous = timer.start_at(task_id, ActiveSessionPolicy::StopPrevious, now)?;
    if let Some(session) = previous {
        commit(tasks, session)?;
    }
    Ok(previous)
}

fn commit(tasks: &mut TaskStore, session: StoppedSession) -> Result<(), CoordinationError> {
    let seconds = i64::try_from(session.elapsed).unwrap_or(i64::MAX);
    if !tasks.add_time(session.task_id, seconds)? {
        warn!(task_id = %session.task_id, elapsed = session.elapsed, "timed task no longer exists, time dropped");
    }
    Ok(())
}

/// Rewrite the history row for `today` from the task store.
///
/// The focus score is the share of the day's tasks that are completed, as a
/// percentage. With no tasks planned the stored score is left alone.
pub fn refresh_today_progress(tasks: &TaskStore, history: &mut HistoryStore, today: NaiveDate) {
    let total = tasks.count_by_date(today);
    let completed = tasks.completed_count_by_date(today);
    let time_spent = tasks.time_spent_by_date(today);

    let focus_score = (total > 0).then(|| ((completed * 100) / total) as u8);
    let completed = u32::try_from(completed).unwrap_or(u32::MAX);

    history.upsert(today, completed, time_spent, focus_score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GoalDraft, GoalTimeframe, TaskDraft};
    use crate::util::date::parse_day;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn goal(goals: &mut GoalStore, goal_type: GoalType, target: f64) -> Uuid {
        goals.add(GoalDraft::new(
            "Goal",
            goal_type,
            GoalTimeframe::Monthly,
            day("2024-03-01"),
            target,
        ))
    }

    fn task_with_time(tasks: &mut TaskStore, goal_id: Uuid, seconds: i64) -> Uuid {
        let id = tasks.add(TaskDraft::new("Work", day("2024-03-05")).with_goal(goal_id));
        tasks.add_time(id, seconds).unwrap();
        id
    }

    #[test]
    fn test_effort_goal_accumulates_task_time() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Effort, 3600.0);

        let first = task_with_time(&mut tasks, goal_id, 1800);
        assert_eq!(complete_task_and_apply_goal_progress(&mut tasks, &mut goals, first), Ok(true));
        assert_eq!(goals.progress(goal_id), Some(1800.0));
        assert!(!goals.get(goal_id).unwrap().is_completed());

        let second = task_with_time(&mut tasks, goal_id, 1900);
        assert_eq!(complete_task_and_apply_goal_progress(&mut tasks, &mut goals, second), Ok(true));
        assert_eq!(goals.progress(goal_id), Some(3700.0));
        assert!(goals.get(goal_id).unwrap().is_completed());
    }

    #[test]
    fn test_quantity_goal_counts_one_per_task() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Quantity, 3.0);

        let task = task_with_time(&mut tasks, goal_id, 5000);
        complete_task_and_apply_goal_progress(&mut tasks, &mut goals, task).unwrap();
        assert_eq!(goals.progress(goal_id), Some(1.0));
    }

    #[test]
    fn test_completing_twice_credits_once() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Quantity, 3.0);
        let task = task_with_time(&mut tasks, goal_id, 0);

        assert_eq!(complete_task_and_apply_goal_progress(&mut tasks, &mut goals, task), Ok(true));
        assert_eq!(complete_task_and_apply_goal_progress(&mut tasks, &mut goals, task), Ok(false));
        assert_eq!(goals.progress(goal_id), Some(1.0));
    }

    #[test]
    fn test_hybrid_goal_requires_amount() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Hybrid, 10.0);
        let task = task_with_time(&mut tasks, goal_id, 600);

        assert_eq!(
            complete_task_and_apply_goal_progress(&mut tasks, &mut goals, task),
            Err(CoordinationError::HybridProgressRequired { goal_id })
        );
        assert!(!tasks.get(task).unwrap().is_completed());
        assert_eq!(goals.progress(goal_id), Some(0.0));

        assert_eq!(complete_task_with_goal_amount(&mut tasks, &mut goals, task, 2.5), Ok(true));
        assert!(tasks.get(task).unwrap().is_completed());
        assert_eq!(goals.progress(goal_id), Some(2.5));
    }

    #[test]
    fn test_orphaned_goal_still_completes_task() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Effort, 100.0);
        let task = task_with_time(&mut tasks, goal_id, 60);
        goals.delete(goal_id);

        assert_eq!(complete_task_and_apply_goal_progress(&mut tasks, &mut goals, task), Ok(true));
        assert!(tasks.get(task).unwrap().is_completed());
    }

    #[test]
    fn test_explicit_amount_for_orphaned_goal_credits_nothing() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        let goal_id = goal(&mut goals, GoalType::Hybrid, 10.0);
        let task = task_with_time(&mut tasks, goal_id, 60);
        goals.delete(goal_id);
        goals.mark_saved();

        assert_eq!(complete_task_with_goal_amount(&mut tasks, &mut goals, task, 4.0), Ok(true));
        assert!(tasks.get(task).unwrap().is_completed());
        assert!(goals.all().is_empty());
        assert!(!goals.needs_save());
    }

    #[test]
    fn test_unknown_task_is_noop() {
        let mut tasks = TaskStore::new();
        let mut goals = GoalStore::new();
        assert_eq!(
            complete_task_and_apply_goal_progress(&mut tasks, &mut goals, Uuid::new_v4()),
            Ok(false)
        );
    }

    #[test]
    fn test_stop_timer_commits_time() {
        let mut timer = TimerStore::new();
        let mut tasks = TaskStore::new();
        let task = tasks.add(TaskDraft::new("Focus", day("2024-03-05")));
        let t0 = Local.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();

        timer.start_at(task, ActiveSessionPolicy::Reject, t0).unwrap();
        let stopped = stop_timer_and_commit_at(&mut timer, &mut tasks, t0 + Duration::seconds(65))
            .unwrap()
            .unwrap();

        assert_eq!(stopped.elapsed, 65);
        assert_eq!(tasks.get(task).unwrap().time_spent, 65);
        assert_eq!(timer.sessions()[0].duration, 65);
        assert!(timer.sessions()[0].completed);

        assert_eq!(stop_timer_and_commit_at(&mut timer, &mut tasks, t0), Ok(None));
    }

    #[test]
    fn test_switch_timer_commits_previous_task() {
        let mut timer = TimerStore::new();
        let mut tasks = TaskStore::new();
        let first = tasks.add(TaskDraft::new("First", day("2024-03-05")));
        let second = tasks.add(TaskDraft::new("Second", day("2024-03-05")));
        let t0 = Local.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();

        assert_eq!(switch_timer_at(&mut timer, &mut tasks, first, t0), Ok(None));
        let previous = switch_timer_at(&mut timer, &mut tasks, second, t0 + Duration::seconds(90))
            .unwrap()
            .unwrap();

        assert_eq!(previous.task_id, first);
        assert_eq!(tasks.get(first).unwrap().time_spent, 90);
        assert_eq!(timer.active_task(), Some(second));
    }

    #[test]
    fn test_refresh_today_progress() {
        let mut tasks = TaskStore::new();
        let mut history = HistoryStore::new();
        let today = day("2024-03-05");

        let done = tasks.add(TaskDraft::new("Done", today));
        tasks.add(TaskDraft::new("Open", today));
        tasks.add(TaskDraft::new("Tomorrow", day("2024-03-06")));
        tasks.add_time(done, 1200).unwrap();
        tasks.set_status(done, TaskStatus::Completed);

        refresh_today_progress(&tasks, &mut history, today);
        let row = history.get(today).unwrap();
        assert_eq!(row.tasks_completed, 1);
        assert_eq!(row.time_spent, 1200);
        assert_eq!(row.focus_score, 50);
        assert_eq!(row.streak_count, 1);

        refresh_today_progress(&tasks, &mut history, today);
        assert_eq!(history.all().len(), 1);
    }

    #[test]
    fn test_refresh_with_no_tasks_keeps_score() {
        let tasks = TaskStore::new();
        let mut history = HistoryStore::new();
        let today = day("2024-03-05");
        history.upsert(today, 0, 0, Some(30));

        refresh_today_progress(&tasks, &mut history, today);
        assert_eq!(history.get(today).unwrap().focus_score, 30);
    }
}
