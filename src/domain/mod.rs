pub mod enums;
pub mod goal;
pub mod progress;
pub mod session;
pub mod settings;
pub mod task;

pub use enums::{GoalTimeframe, GoalType, Priority, SessionKind, TaskStatus, Theme, WeekStart};
pub use goal::{clamp_progress, completion_ratio, Goal, GoalDraft, GoalPatch, Milestone, MilestonePatch};
pub use progress::{DailyProgress, PeriodStats};
pub use session::TimerSession;
pub use settings::{Settings, SettingsPatch, DEFAULT_MAX_DAILY_TASKS};
pub use task::{Task, TaskDraft, TaskPatch};
