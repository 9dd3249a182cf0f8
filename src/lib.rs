//! State and analytics core for a daily task planner: tasks, goals, a focus
//! timer, per-day history and settings, with JSON persistence and a markdown
//! report.

pub mod context;
pub mod coordination;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod report;
pub mod store;
pub mod util;

pub use context::AppContext;
pub use error::{CoordinationError, StoreError, TimerError};
