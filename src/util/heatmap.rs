use crate::domain::DailyProgress;
use serde::{Deserialize, Serialize};

/// Tasks per day that saturate the task half of the score
pub const DEFAULT_MAX_TASKS: u32 = 5;
/// Tracked seconds per day that saturate the time half of the score (8 hours)
pub const DEFAULT_MAX_TIME: u64 = 8 * 60 * 60;

/// Calendar heatmap bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatLevel {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Max = 4,
}

impl HeatLevel {
    /// Bucket a 0..=1 score at the 0 / 0.25 / 0.5 / 0.75 thresholds
    pub fn from_score(score: f64) -> Self {
        if score <= 0.0 || score.is_nan() {
            HeatLevel::None
        } else if score < 0.25 {
            HeatLevel::Low
        } else if score < 0.5 {
            HeatLevel::Medium
        } else if score < 0.75 {
            HeatLevel::High
        } else {
            HeatLevel::Max
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Single character cell for terminal output
    pub fn glyph(self) -> char {
        match self {
            HeatLevel::None => '.',
            HeatLevel::Low => '░',
            HeatLevel::Medium => '▒',
            HeatLevel::High => '▓',
            HeatLevel::Max => '█',
        }
    }
}

/// Saturation points for the heatmap score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapScale {
    pub max_tasks: u32,
    pub max_time: u64,
}

impl Default for HeatmapScale {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            max_time: DEFAULT_MAX_TIME,
        }
    }
}

impl HeatmapScale {
    /// Mean of the task ratio and the time ratio. A missing day scores 0.
    pub fn score(&self, progress: Option<&DailyProgress>) -> f64 {
        let Some(progress) = progress else {
            return 0.0;
        };
        let task_ratio = ratio(progress.tasks_completed as f64, self.max_tasks as f64);
        let time_ratio = ratio(progress.time_spent as f64, self.max_time as f64);
        (task_ratio + time_ratio) / 2.0
    }

    pub fn level(&self, progress: Option<&DailyProgress>) -> HeatLevel {
        HeatLevel::from_score(self.score(progress))
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        value / max
    }
}

/// Heat level with the default scale
pub fn heat_level(progress: Option<&DailyProgress>) -> HeatLevel {
    HeatmapScale::default().level(progress)
}
