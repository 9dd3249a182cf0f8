pub mod generator;
pub mod stats;

pub use generator::{default_report_path, render_markdown, write_report};
pub use stats::{AnalyticsSnapshot, DayStats, GoalProgressRow, TagStats};
