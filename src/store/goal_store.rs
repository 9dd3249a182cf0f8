use crate::domain::{Goal, GoalDraft, GoalPatch, GoalTimeframe, GoalType, Milestone, MilestonePatch};
use crate::util::date;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Owns every goal and the milestones embedded in them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalStore {
    goals: Vec<Goal>,
    #[serde(skip)]
    needs_save: bool,
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: Vec<Goal>) -> Self {
        Self {
            goals,
            needs_save: false,
        }
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn mark_saved(&mut self) {
        self.needs_save = false;
    }

    fn goal_mut(&mut self, id: Uuid, op: &'static str) -> Option<&mut Goal> {
        let goal = self.goals.iter_mut().find(|g| g.id == id);
        if goal.is_none() {
            debug!(goal_id = %id, op, "unknown goal, ignoring");
        }
        goal
    }

    fn modify<R>(
        &mut self,
        id: Uuid,
        op: &'static str,
        f: impl FnOnce(&mut Goal, DateTime<Local>) -> R,
    ) -> Option<R> {
        let goal = self.goal_mut(id, op)?;
        let result = f(goal, Local::now());
        self.needs_save = true;
        Some(result)
    }

    pub fn add(&mut self, draft: GoalDraft) -> Uuid {
        let goal = Goal::from_draft(draft, Local::now());
        let id = goal.id;
        debug!(goal_id = %id, goal_type = goal.goal_type.name(), "goal added");
        self.goals.push(goal);
        self.needs_save = true;
        id
    }

    pub fn update(&mut self, id: Uuid, patch: GoalPatch) -> bool {
        self.modify(id, "update", |goal, now| goal.apply(patch, now))
            .is_some()
    }

    /// Tasks linked to a deleted goal keep their (now dangling) reference
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            debug!(goal_id = %id, op = "delete", "unknown goal, ignoring");
            return false;
        }
        self.needs_save = true;
        true
    }

    pub fn archive(&mut self, id: Uuid) -> bool {
        self.set_archived(id, true)
    }

    pub fn unarchive(&mut self, id: Uuid) -> bool {
        self.set_archived(id, false)
    }

    fn set_archived(&mut self, id: Uuid, archived: bool) -> bool {
        self.modify(id, "set_archived", |goal, now| {
            goal.archived = archived;
            goal.updated_at = now;
        })
        .is_some()
    }

    /// Add `delta` to a goal's progress. The result never drops below zero
    /// and may exceed the target.
    pub fn adjust_progress(&mut self, id: Uuid, delta: f64) -> bool {
        self.modify(id, "adjust_progress", |goal, now| {
            let was_reached = goal.is_target_reached();
            goal.adjust_progress(delta, now);
            if !was_reached && goal.is_target_reached() {
                info!(goal_id = %goal.id, current = goal.current, target = goal.target, "goal target reached");
            }
        })
        .is_some()
    }

    /// Overwrite the progress value, floored at zero
    pub fn set_progress(&mut self, id: Uuid, value: f64) -> bool {
        self.modify(id, "set_progress", |goal, now| {
            goal.current = 0.0;
            goal.adjust_progress(value, now);
        })
        .is_some()
    }

    pub fn reset_progress(&mut self, id: Uuid) -> bool {
        self.set_progress(id, 0.0)
    }

    /// Append a milestone to a goal. `None` when the goal does not exist.
    pub fn add_milestone(
        &mut self,
        goal_id: Uuid,
        title: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> Option<Uuid> {
        let title = title.into();
        self.modify(goal_id, "add_milestone", |goal, now| {
            let milestone = Milestone::new(title, due_date, now);
            let id = milestone.id;
            goal.milestones.push(milestone);
            goal.updated_at = now;
            id
        })
    }

    pub fn update_milestone(&mut self, goal_id: Uuid, milestone_id: Uuid, patch: MilestonePatch) -> bool {
        self.modify_milestone(goal_id, milestone_id, "update_milestone", |milestone| {
            if let Some(title) = patch.title {
                milestone.title = title;
            }
            if let Some(completed) = patch.completed {
                milestone.completed = completed;
            }
            if let Some(due_date) = patch.due_date {
                milestone.due_date = due_date;
            }
        })
    }

    pub fn toggle_milestone(&mut self, goal_id: Uuid, milestone_id: Uuid) -> bool {
        self.modify_milestone(goal_id, milestone_id, "toggle_milestone", |milestone| {
            milestone.completed = !milestone.completed;
        })
    }

    pub fn delete_milestone(&mut self, goal_id: Uuid, milestone_id: Uuid) -> bool {
        let Some(goal) = self.goal_mut(goal_id, "delete_milestone") else {
            return false;
        };
        let before = goal.milestones.len();
        goal.milestones.retain(|m| m.id != milestone_id);
        if goal.milestones.len() == before {
            debug!(%goal_id, %milestone_id, op = "delete_milestone", "unknown milestone, ignoring");
            return false;
        }
        goal.updated_at = Local::now();
        self.needs_save = true;
        true
    }

    /// Only marks the store dirty when the milestone exists
    fn modify_milestone(
        &mut self,
        goal_id: Uuid,
        milestone_id: Uuid,
        op: &'static str,
        f: impl FnOnce(&mut Milestone),
    ) -> bool {
        let Some(goal) = self.goal_mut(goal_id, op) else {
            return false;
        };
        let Some(milestone) = goal.milestone_mut(milestone_id) else {
            debug!(%goal_id, %milestone_id, op, "unknown milestone, ignoring");
            return false;
        };
        f(milestone);
        goal.updated_at = Local::now();
        self.needs_save = true;
        true
    }

    pub fn all(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn active_as_of(&self, today: NaiveDate) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.is_active_as_of(today)).collect()
    }

    pub fn active(&self) -> Vec<&Goal> {
        self.active_as_of(date::today())
    }

    pub fn completed(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.is_completed()).collect()
    }

    pub fn archived(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.archived).collect()
    }

    pub fn overdue_as_of(&self, today: NaiveDate) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.is_overdue_as_of(today)).collect()
    }

    pub fn overdue(&self) -> Vec<&Goal> {
        self.overdue_as_of(date::today())
    }

    pub fn by_timeframe(&self, timeframe: GoalTimeframe) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.timeframe == timeframe).collect()
    }

    pub fn by_type(&self, goal_type: GoalType) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.goal_type == goal_type).collect()
    }

    /// Case-insensitive search over title, description and milestone titles
    pub fn search(&self, query: &str) -> Vec<&Goal> {
        let needle = query.to_lowercase();
        self.goals.iter().filter(|g| g.matches(&needle)).collect()
    }

    pub fn progress(&self, id: Uuid) -> Option<f64> {
        self.get(id).map(|g| g.current)
    }

    /// 0 to 100; 0 for an unknown goal or a zero target
    pub fn completion_percentage(&self, id: Uuid) -> f64 {
        self.get(id).map_or(0.0, Goal::completion_percentage)
    }

    pub fn days_remaining(&self, id: Uuid, today: NaiveDate) -> Option<i64> {
        self.get(id).map(|g| g.days_remaining(today))
    }
}
