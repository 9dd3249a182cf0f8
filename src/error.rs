use thiserror::Error;
use uuid::Uuid;

/// Rejected store mutations. Unknown ids are not errors; those operations are no-ops.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("time delta for task {task_id} must not be negative (got {delta}s)")]
    NegativeTime { task_id: Uuid, delta: i64 },
}

/// Rejected timer transitions
#[derive(Debug, Error, PartialEq)]
pub enum TimerError {
    #[error("timer is already active for task {active_task}")]
    AlreadyActive { active_task: Uuid },
}

/// Failures of the cross-store rules
#[derive(Debug, Error, PartialEq)]
pub enum CoordinationError {
    #[error("goal {goal_id} is a hybrid goal; completing a linked task needs an explicit progress amount")]
    HybridProgressRequired { goal_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Timer(#[from] TimerError),
}
