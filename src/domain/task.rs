use super::enums::{Priority, TaskStatus};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A single task planned for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Day the task is planned for
    pub date: NaiveDate,
    /// Linked goal; may point at a goal that no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
    /// Accumulated tracked time in seconds
    pub time_spent: u64,
    /// Estimated time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u64>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Task {
    /// Build a fresh task from a draft. Status and tracked time always start at zero.
    pub fn from_draft(draft: TaskDraft, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: TaskStatus::Pending,
            date: draft.date,
            goal_id: draft.goal_id,
            time_spent: 0,
            estimated_time: draft.estimated_time,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this task under a new id, reset to pending with no tracked time
    pub fn duplicate(&self, date: Option<NaiveDate>, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.unwrap_or(self.date),
            status: TaskStatus::Pending,
            time_spent: 0,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Local>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(goal_id) = patch.goal_id {
            self.goal_id = goal_id;
        }
        if let Some(time_spent) = patch.time_spent {
            self.time_spent = time_spent;
        }
        if let Some(estimated_time) = patch.estimated_time {
            self.estimated_time = estimated_time;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Planned for a day before `today` and still not completed
    pub fn is_overdue_as_of(&self, today: NaiveDate) -> bool {
        self.date < today && !self.is_completed()
    }

    /// Case-insensitive substring match over title, description and tags.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Ratio of tracked time to the estimate, if one was given
    pub fn estimate_ratio(&self) -> Option<f64> {
        match self.estimated_time {
            Some(0) | None => None,
            Some(estimate) => Some(self.time_spent as f64 / estimate as f64),
        }
    }
}

/// Fields a caller provides when creating a task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub date: NaiveDate,
    pub goal_id: Option<Uuid>,
    pub estimated_time: Option<u64>,
    pub tags: BTreeSet<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            date,
            goal_id: None,
            estimated_time: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_goal(mut self, goal_id: Uuid) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    pub fn with_estimate(mut self, seconds: u64) -> Self {
        self.estimated_time = Some(seconds);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

/// Partial update for a task. `None` leaves a field untouched; the nested
/// options on optional fields allow clearing them. Id and creation time are
/// not expressible here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub date: Option<NaiveDate>,
    pub goal_id: Option<Option<Uuid>>,
    pub time_spent: Option<u64>,
    pub estimated_time: Option<Option<u64>>,
    pub tags: Option<BTreeSet<String>>,
}
