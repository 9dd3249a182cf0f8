pub mod date;
pub mod heatmap;
pub mod streak;

pub use date::{
    add_days, day_name, days_until, format_clock, format_day, format_human, is_in_range,
    month_bounds, month_dates, month_name, parse_day, relative_label, start_of_week, today,
    tomorrow, week_dates, yesterday,
};
pub use heatmap::{heat_level, HeatLevel, HeatmapScale, DEFAULT_MAX_TASKS, DEFAULT_MAX_TIME};
pub use streak::{current_streak, longest_streak};
