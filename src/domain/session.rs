use super::enums::SessionKind;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timed interval of work (or break) on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub id: Uuid,
    pub task_id: Uuid,
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
    /// Committed seconds; only meaningful once `completed` is set
    pub duration: u64,
    pub kind: SessionKind,
    pub completed: bool,
}

impl TimerSession {
    pub fn open(task_id: Uuid, kind: SessionKind, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            started_at: now,
            ended_at: None,
            duration: 0,
            kind,
            completed: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none() && !self.completed
    }

    /// Close the session and commit its duration
    pub fn complete(&mut self, duration: u64, now: DateTime<Local>) {
        self.ended_at = Some(now);
        self.duration = duration;
        self.completed = true;
    }

    /// Close the session without committing any time
    pub fn abandon(&mut self, now: DateTime<Local>) {
        self.ended_at = Some(now);
        self.duration = 0;
        self.completed = false;
    }
}
