use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Task priority, 1 (highest) to 5 (lowest).
///
/// Ordering follows the numeric value, so sorting ascending puts the most
/// important tasks first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Highest = 1,
    High = 2,
    #[default]
    Medium = 3,
    Low = 4,
    Lowest = 5,
}

impl Priority {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Highest),
            2 => Ok(Priority::High),
            3 => Ok(Priority::Medium),
            4 => Ok(Priority::Low),
            5 => Ok(Priority::Lowest),
            other => Err(format!("priority must be between 1 and 5, got {}", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.value())
    }
}

/// How progress toward a goal is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Time based, target and progress are seconds
    Effort,
    /// Unit based, target and progress are counts of `unit`
    Quantity,
    /// Both time and units; completing a task needs an explicit amount
    Hybrid,
}

impl GoalType {
    pub fn name(&self) -> &'static str {
        match self {
            GoalType::Effort => "Effort",
            GoalType::Quantity => "Quantity",
            GoalType::Hybrid => "Hybrid",
        }
    }
}

/// Horizon a goal is planned over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTimeframe {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl GoalTimeframe {
    /// Default number of days between start and end date when a goal is created
    pub fn default_span_days(&self) -> i64 {
        match self {
            GoalTimeframe::Daily => 1,
            GoalTimeframe::Weekly => 7,
            GoalTimeframe::Monthly => 30,
            GoalTimeframe::Quarterly => 90,
            GoalTimeframe::Yearly => 365,
            GoalTimeframe::Custom => 30,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GoalTimeframe::Daily => "Daily",
            GoalTimeframe::Weekly => "Weekly",
            GoalTimeframe::Monthly => "Monthly",
            GoalTimeframe::Quarterly => "Quarterly",
            GoalTimeframe::Yearly => "Yearly",
            GoalTimeframe::Custom => "Custom",
        }
    }

    pub fn all() -> &'static [GoalTimeframe] {
        &[
            GoalTimeframe::Daily,
            GoalTimeframe::Weekly,
            GoalTimeframe::Monthly,
            GoalTimeframe::Quarterly,
            GoalTimeframe::Yearly,
            GoalTimeframe::Custom,
        ]
    }
}

/// Kind of a timer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// First day of the week for weekly views and stats. Stored as a weekday
/// number (0 Sunday, 1 Monday, 6 Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeekStart {
    Sunday = 0,
    Monday = 1,
    Saturday = 6,
}

impl TryFrom<u8> for WeekStart {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            6 => Ok(WeekStart::Saturday),
            other => Err(format!("week start must be 0, 1 or 6, got {}", other)),
        }
    }
}

impl From<WeekStart> for u8 {
    fn from(week_start: WeekStart) -> Self {
        week_start as u8
    }
}

impl WeekStart {
    pub fn weekday(&self) -> chrono::Weekday {
        match self {
            WeekStart::Sunday => chrono::Weekday::Sun,
            WeekStart::Monday => chrono::Weekday::Mon,
            WeekStart::Saturday => chrono::Weekday::Sat,
        }
    }
}
