use super::enums::{GoalTimeframe, GoalType};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color used when a draft does not pick one
pub const DEFAULT_GOAL_COLOR: &str = "#6366F1";

/// Floor a progress value at zero. Progress has no ceiling.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Fraction of `target` reached, capped at 1.0. A non-positive target reports 0.
pub fn completion_ratio(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target).clamp(0.0, 1.0)
}

/// A checkpoint embedded in a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Local>,
}

impl Milestone {
    pub fn new(title: String, due_date: Option<NaiveDate>, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            completed: false,
            due_date,
            created_at: now,
        }
    }
}

/// Partial update for a milestone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestonePatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
}

/// A longer-horizon target that tasks contribute progress to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub timeframe: GoalTimeframe,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Seconds for effort goals, units otherwise
    pub target: f64,
    /// Same unit as `target`; never negative, may exceed the target
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub color: String,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Goal {
    pub fn from_draft(draft: GoalDraft, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            goal_type: draft.goal_type,
            timeframe: draft.timeframe,
            start_date: draft.start_date,
            end_date: draft.end_date,
            target: draft.target,
            current: 0.0,
            unit: draft.unit,
            milestones: Vec::new(),
            color: draft.color,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: GoalPatch, now: DateTime<Local>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(goal_type) = patch.goal_type {
            self.goal_type = goal_type;
        }
        if let Some(timeframe) = patch.timeframe {
            self.timeframe = timeframe;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.updated_at = now;
    }

    /// Add `delta` to the current value, flooring the result at zero
    pub fn adjust_progress(&mut self, delta: f64, now: DateTime<Local>) {
        self.current = clamp_progress(self.current + delta);
        self.updated_at = now;
    }

    pub fn is_target_reached(&self) -> bool {
        self.current >= self.target
    }

    pub fn is_active_as_of(&self, today: NaiveDate) -> bool {
        !self.archived && self.end_date >= today && !self.is_target_reached()
    }

    pub fn is_completed(&self) -> bool {
        !self.archived && self.is_target_reached()
    }

    pub fn is_overdue_as_of(&self, today: NaiveDate) -> bool {
        !self.archived && self.end_date < today && !self.is_target_reached()
    }

    /// Percentage of the target reached, 0 to 100
    pub fn completion_percentage(&self) -> f64 {
        completion_ratio(self.current, self.target) * 100.0
    }

    /// Whole days from `today` until the end date; negative once past it
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self
                .milestones
                .iter()
                .any(|m| m.title.to_lowercase().contains(needle))
    }

    pub fn milestone_mut(&mut self, milestone_id: Uuid) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == milestone_id)
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }
}

/// Fields a caller provides when creating a goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub timeframe: GoalTimeframe,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target: f64,
    pub unit: Option<String>,
    pub color: String,
}

impl GoalDraft {
    /// Draft whose end date follows the timeframe's default span
    pub fn new(
        title: impl Into<String>,
        goal_type: GoalType,
        timeframe: GoalTimeframe,
        start_date: NaiveDate,
        target: f64,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            goal_type,
            timeframe,
            start_date,
            end_date: start_date + Duration::days(timeframe.default_span_days()),
            target,
            unit: None,
            color: DEFAULT_GOAL_COLOR.to_string(),
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Partial update for a goal. Progress, milestones and the archived flag have
/// dedicated operations and are not part of the patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub goal_type: Option<GoalType>,
    pub timeframe: Option<GoalTimeframe>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub target: Option<f64>,
    pub unit: Option<Option<String>>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn effort_goal(target: f64) -> Goal {
        let draft = GoalDraft::new(
            "Deep work",
            GoalType::Effort,
            GoalTimeframe::Weekly,
            day("2024-03-01"),
            target,
        );
        Goal::from_draft(draft, Local::now())
    }

    #[test]
    fn test_clamp_progress_boundaries() {
        assert_eq!(clamp_progress(-0.5), 0.0);
        assert_eq!(clamp_progress(0.0), 0.0);
        assert_eq!(clamp_progress(12.5), 12.5);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
    }

    #[test]
    fn test_completion_ratio_boundaries() {
        assert_eq!(completion_ratio(5.0, 0.0), 0.0);
        assert_eq!(completion_ratio(0.0, 10.0), 0.0);
        assert_eq!(completion_ratio(5.0, 10.0), 0.5);
        assert_eq!(completion_ratio(10.0, 10.0), 1.0);
        assert_eq!(completion_ratio(25.0, 10.0), 1.0);
    }

    #[test]
    fn test_draft_end_date_from_timeframe() {
        let draft = GoalDraft::new(
            "Read",
            GoalType::Quantity,
            GoalTimeframe::Weekly,
            day("2024-03-01"),
            3.0,
        );
        assert_eq!(draft.end_date, day("2024-03-08"));
    }

    #[test]
    fn test_adjust_progress_floors_at_zero() {
        let mut goal = effort_goal(100.0);
        goal.adjust_progress(30.0, Local::now());
        goal.adjust_progress(-80.0, Local::now());
        assert_eq!(goal.current, 0.0);
        goal.adjust_progress(250.0, Local::now());
        assert_eq!(goal.current, 250.0);
        assert_eq!(goal.completion_percentage(), 100.0);
    }

    #[test]
    fn test_partitions() {
        let mut goal = effort_goal(100.0);
        let before_end = day("2024-03-05");
        let after_end = day("2024-03-20");

        assert!(goal.is_active_as_of(before_end));
        assert!(goal.is_overdue_as_of(after_end));
        assert!(!goal.is_completed());

        goal.current = 100.0;
        assert!(goal.is_completed());
        assert!(!goal.is_active_as_of(before_end));
        assert!(!goal.is_overdue_as_of(after_end));

        goal.archived = true;
        assert!(!goal.is_completed());
    }

    #[test]
    fn test_days_remaining() {
        let goal = effort_goal(10.0);
        assert_eq!(goal.days_remaining(day("2024-03-01")), 7);
        assert_eq!(goal.days_remaining(day("2024-03-10")), -2);
    }

    #[test]
    fn test_goal_serializes_type_field() {
        let goal = effort_goal(3600.0);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "effort");
        assert_eq!(json["timeframe"], "weekly");
        assert_eq!(json["startDate"], "2024-03-01");
    }
}
