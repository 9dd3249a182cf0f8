use crate::domain::{Priority, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::error::StoreError;
use crate::util::date;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Owns every task. Mutations addressed to an unknown id are no-ops and
/// return `false`; they never fail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
    #[serde(skip)]
    needs_save: bool,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            needs_save: false,
        }
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn mark_saved(&mut self) {
        self.needs_save = false;
    }

    /// Run `op` on the task with `id`, stamping the mutation time.
    fn modify(&mut self, id: Uuid, op: &'static str, f: impl FnOnce(&mut Task, DateTime<Local>)) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task, Local::now());
                self.needs_save = true;
                true
            }
            None => {
                debug!(task_id = %id, op, "unknown task, ignoring");
                false
            }
        }
    }

    pub fn add(&mut self, draft: TaskDraft) -> Uuid {
        let task = Task::from_draft(draft, Local::now());
        let id = task.id;
        debug!(task_id = %id, date = %task.date, "task added");
        self.tasks.push(task);
        self.needs_save = true;
        id
    }

    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> bool {
        self.modify(id, "update", |task, now| task.apply(patch, now))
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(task_id = %id, op = "delete", "unknown task, ignoring");
            return false;
        }
        self.needs_save = true;
        true
    }

    pub fn set_status(&mut self, id: Uuid, status: TaskStatus) -> bool {
        self.modify(id, "set_status", |task, now| {
            task.status = status;
            task.updated_at = now;
        })
    }

    /// Add tracked seconds to a task. Negative deltas are rejected outright
    /// so accumulated totals can never shrink.
    pub fn add_time(&mut self, id: Uuid, delta_seconds: i64) -> Result<bool, StoreError> {
        if delta_seconds < 0 {
            return Err(StoreError::NegativeTime {
                task_id: id,
                delta: delta_seconds,
            });
        }
        let delta = delta_seconds as u64;
        Ok(self.modify(id, "add_time", |task, now| {
            task.time_spent = task.time_spent.saturating_add(delta);
            task.updated_at = now;
        }))
    }

    pub fn move_to_date(&mut self, id: Uuid, date: NaiveDate) -> bool {
        self.modify(id, "move_to_date", |task, now| {
            task.date = date;
            task.updated_at = now;
        })
    }

    pub fn move_to_tomorrow(&mut self, id: Uuid) -> bool {
        self.move_to_date(id, date::tomorrow())
    }

    /// Copy a task, optionally onto another day. Returns the new id, or
    /// `None` when the source does not exist.
    pub fn duplicate(&mut self, id: Uuid, new_date: Option<NaiveDate>) -> Option<Uuid> {
        let Some(source) = self.get(id) else {
            debug!(task_id = %id, op = "duplicate", "unknown task, ignoring");
            return None;
        };
        let copy = source.duplicate(new_date, Local::now());
        let new_id = copy.id;
        self.tasks.push(copy);
        self.needs_save = true;
        Some(new_id)
    }

    /// Adding a tag the task already carries changes nothing
    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.modify(id, "add_tag", |task, now| {
            if task.tags.insert(tag.to_string()) {
                task.updated_at = now;
            }
        })
    }

    /// Removing a tag the task does not carry changes nothing
    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.modify(id, "remove_tag", |task, now| {
            if task.tags.remove(tag) {
                task.updated_at = now;
            }
        })
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks planned for `date`, most important first, then oldest first.
    /// The first `max_daily_tasks` of this list are the day's plan.
    pub fn by_date(&self, date: NaiveDate) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.date == date).collect();
        tasks.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        tasks
    }

    /// The day's tasks that fit under the cap, in daily order
    pub fn within_cap(&self, date: NaiveDate, cap: u32) -> Vec<&Task> {
        let mut tasks = self.by_date(date);
        tasks.truncate(cap as usize);
        tasks
    }

    pub fn is_at_capacity(&self, date: NaiveDate, cap: u32) -> bool {
        self.count_by_date(date) >= cap as usize
    }

    pub fn by_goal(&self, goal_id: Uuid) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.goal_id == Some(goal_id))
            .collect()
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.priority == priority).collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.tags.contains(tag)).collect()
    }

    pub fn count_by_date(&self, date: NaiveDate) -> usize {
        self.tasks.iter().filter(|t| t.date == date).count()
    }

    pub fn completed_count_by_date(&self, date: NaiveDate) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.date == date && t.is_completed())
            .count()
    }

    /// Seconds tracked on all tasks planned for `date`
    pub fn time_spent_by_date(&self, date: NaiveDate) -> u64 {
        self.tasks
            .iter()
            .filter(|t| t.date == date)
            .map(|t| t.time_spent)
            .sum()
    }

    pub fn overdue_as_of(&self, today: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_overdue_as_of(today))
            .collect()
    }

    pub fn overdue(&self) -> Vec<&Task> {
        self.overdue_as_of(date::today())
    }

    /// Case-insensitive substring search over title, description and tags
    pub fn search(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.tasks.iter().filter(|t| t.matches(&needle)).collect()
    }

    /// Every tag in use, deduplicated and sorted
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tasks
            .iter()
            .flat_map(|t| t.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        date::parse_day(s).unwrap()
    }

    fn store_with(titles: &[(&str, Priority)], date: NaiveDate) -> (TaskStore, Vec<Uuid>) {
        let mut store = TaskStore::new();
        let ids = titles
            .iter()
            .map(|(title, priority)| store.add(TaskDraft::new(*title, date).with_priority(*priority)))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_add_forces_pending_and_zero_time() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("Write", day("2024-03-01")).with_tag("work"));
        let task = store.get(id).unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.time_spent, 0);
        assert!(task.tags.contains("work"));
        assert!(store.needs_save());
    }

    #[test]
    fn test_by_date_orders_by_priority_then_creation() {
        let date = day("2024-03-01");
        let (mut store, _) = store_with(
            &[("c", Priority::Medium), ("a", Priority::Highest), ("b", Priority::High)],
            date,
        );
        store.add(TaskDraft::new("other day", day("2024-03-02")));
        store.add(TaskDraft::new("a2", date).with_priority(Priority::Highest));

        let titles: Vec<&str> = store.by_date(date).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "a2", "b", "c"]);

        let priorities: Vec<u8> = store
            .by_date(date)
            .iter()
            .map(|t| t.priority.value())
            .collect();
        assert_eq!(priorities, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_within_cap() {
        let date = day("2024-03-01");
        let (store, _) = store_with(
            &[
                ("e", Priority::Lowest),
                ("a", Priority::Highest),
                ("c", Priority::Medium),
            ],
            date,
        );
        let titles: Vec<&str> = store.within_cap(date, 2).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert!(store.is_at_capacity(date, 3));
        assert!(!store.is_at_capacity(date, 5));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = TaskStore::new();
        let missing = Uuid::new_v4();

        assert!(!store.update(missing, TaskPatch::default()));
        assert!(!store.delete(missing));
        assert!(!store.set_status(missing, TaskStatus::Completed));
        assert_eq!(store.add_time(missing, 30), Ok(false));
        assert!(!store.move_to_date(missing, day("2024-03-01")));
        assert_eq!(store.duplicate(missing, None), None);
        assert!(!store.add_tag(missing, "x"));
        assert!(!store.needs_save());
    }

    #[test]
    fn test_add_time_is_additive_and_rejects_negative() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("Read", day("2024-03-01")));

        assert_eq!(store.add_time(id, 60), Ok(true));
        assert_eq!(store.add_time(id, 30), Ok(true));
        assert_eq!(store.get(id).unwrap().time_spent, 90);

        let err = store.add_time(id, -10).unwrap_err();
        assert_eq!(err, StoreError::NegativeTime { task_id: id, delta: -10 });
        assert_eq!(store.get(id).unwrap().time_spent, 90);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("Draft", day("2024-03-01")));
        let created = store.get(id).unwrap().created_at;

        store.update(
            id,
            TaskPatch {
                title: Some("Final".to_string()),
                priority: Some(Priority::Highest),
                ..Default::default()
            },
        );

        let task = store.get(id).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.title, "Final");
        assert_eq!(task.priority, Priority::Highest);
        assert_eq!(task.created_at, created);
        assert!(task.updated_at >= created);
    }

    #[test]
    fn test_tags_are_idempotent() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("Tagged", day("2024-03-01")));

        store.add_tag(id, "x");
        let once = store.get(id).unwrap().tags.clone();
        store.add_tag(id, "x");
        assert_eq!(store.get(id).unwrap().tags, once);

        store.remove_tag(id, "absent");
        assert_eq!(store.get(id).unwrap().tags, once);

        store.remove_tag(id, "x");
        assert!(store.get(id).unwrap().tags.is_empty());
    }

    #[test]
    fn test_duplicate_resets_status_and_time() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("Run", day("2024-03-01")).with_tag("health"));
        store.set_status(id, TaskStatus::Completed);
        store.add_time(id, 1200).unwrap();

        let copy_id = store.duplicate(id, Some(day("2024-03-02"))).unwrap();
        let copy = store.get(copy_id).unwrap();

        assert_ne!(copy_id, id);
        assert_eq!(copy.title, "Run");
        assert_eq!(copy.date, day("2024-03-02"));
        assert_eq!(copy.status, TaskStatus::Pending);
        assert_eq!(copy.time_spent, 0);
        assert!(copy.tags.contains("health"));
    }

    #[test]
    fn test_date_aggregates() {
        let date = day("2024-03-01");
        let mut store = TaskStore::new();
        let a = store.add(TaskDraft::new("a", date));
        let b = store.add(TaskDraft::new("b", date));
        store.add(TaskDraft::new("c", day("2024-03-02")));

        store.set_status(a, TaskStatus::Completed);
        store.add_time(a, 100).unwrap();
        store.add_time(b, 50).unwrap();

        assert_eq!(store.count_by_date(date), 2);
        assert_eq!(store.completed_count_by_date(date), 1);
        assert_eq!(store.time_spent_by_date(date), 150);
    }

    #[test]
    fn test_overdue() {
        let mut store = TaskStore::new();
        let old_open = store.add(TaskDraft::new("old", day("2024-03-01")));
        let old_done = store.add(TaskDraft::new("done", day("2024-03-01")));
        store.add(TaskDraft::new("today", day("2024-03-05")));
        store.set_status(old_done, TaskStatus::Completed);

        let overdue: Vec<Uuid> = store.overdue_as_of(day("2024-03-05")).iter().map(|t| t.id).collect();
        assert_eq!(overdue, vec![old_open]);
    }

    #[test]
    fn test_search_and_tags() {
        let date = day("2024-03-01");
        let mut store = TaskStore::new();
        store.add(TaskDraft::new("Write Blog", date).with_tag("writing"));
        store.add(TaskDraft::new("Email", date).with_description("reply to BLOG readers"));
        store.add(TaskDraft::new("Gym", date).with_tag("health").with_tag("Writing"));

        assert_eq!(store.search("blog").len(), 2);
        assert_eq!(store.search("WRITING").len(), 2);
        assert_eq!(store.all_tags(), vec!["Writing", "health", "writing"]);
        assert_eq!(store.by_tag("health").len(), 1);
    }

    #[test]
    fn test_by_goal_and_move() {
        let goal = Uuid::new_v4();
        let mut store = TaskStore::new();
        let linked = store.add(TaskDraft::new("linked", day("2024-03-01")).with_goal(goal));
        store.add(TaskDraft::new("free", day("2024-03-01")));

        assert_eq!(store.by_goal(goal).len(), 1);
        assert!(store.move_to_date(linked, day("2024-03-09")));
        assert_eq!(store.count_by_date(day("2024-03-09")), 1);
    }

    #[test]
    fn test_delete() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("gone", day("2024-03-01")));
        assert!(store.delete(id));
        assert!(store.get(id).is_none());
        assert!(store.all().is_empty());
    }
}
