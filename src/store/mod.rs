pub mod goal_store;
pub mod history_store;
pub mod settings_store;
pub mod task_store;
pub mod timer_store;

pub use goal_store::GoalStore;
pub use history_store::{HistoryStore, MAX_FOCUS_SCORE};
pub use settings_store::SettingsStore;
pub use task_store::TaskStore;
pub use timer_store::{ActiveSessionPolicy, StoppedSession, TimerState, TimerStore};
