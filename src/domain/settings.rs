use super::enums::{Theme, WeekStart};
use serde::{Deserialize, Serialize};

/// Default cap on tasks planned per day
pub const DEFAULT_MAX_DAILY_TASKS: u32 = 5;

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub reminder_enabled: bool,
    /// Local time of day as "HH:MM"
    pub reminder_time: String,
    pub week_starts_on: WeekStart,
    pub show_completed_tasks: bool,
    pub focus_mode: bool,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub max_daily_tasks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            reminder_enabled: true,
            reminder_time: "09:00".to_string(),
            week_starts_on: WeekStart::Monday,
            show_completed_tasks: true,
            focus_mode: false,
            sound_enabled: true,
            vibration_enabled: true,
            max_daily_tasks: DEFAULT_MAX_DAILY_TASKS,
        }
    }
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(enabled) = patch.reminder_enabled {
            self.reminder_enabled = enabled;
        }
        if let Some(time) = patch.reminder_time {
            self.reminder_time = time;
        }
        if let Some(week_start) = patch.week_starts_on {
            self.week_starts_on = week_start;
        }
        if let Some(show) = patch.show_completed_tasks {
            self.show_completed_tasks = show;
        }
        if let Some(focus) = patch.focus_mode {
            self.focus_mode = focus;
        }
        if let Some(sound) = patch.sound_enabled {
            self.sound_enabled = sound;
        }
        if let Some(vibration) = patch.vibration_enabled {
            self.vibration_enabled = vibration;
        }
        // The cap must stay positive
        if let Some(max) = patch.max_daily_tasks.filter(|m| *m > 0) {
            self.max_daily_tasks = max;
        }
    }
}

/// Partial update for settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<String>,
    pub week_starts_on: Option<WeekStart>,
    pub show_completed_tasks: Option<bool>,
    pub focus_mode: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub vibration_enabled: Option<bool>,
    pub max_daily_tasks: Option<u32>,
}
