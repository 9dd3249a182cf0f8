use crate::domain::GoalType;
use crate::persistence::atomic_write;
use crate::report::stats::{AnalyticsSnapshot, GoalProgressRow};
use crate::util::date;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn format_goal_value(goal_type: GoalType, value: f64, unit: Option<&str>) -> String {
    match (goal_type, unit) {
        (GoalType::Effort, _) => date::format_human(value.max(0.0) as u64),
        (_, Some(unit)) => format!("{} {}", value, unit),
        (_, None) => format!("{}", value),
    }
}

fn goal_line(row: &GoalProgressRow) -> String {
    let unit = row.unit.as_deref();
    format!(
        "- **{}** ({}): {} / {} ({}), {} days left\n",
        row.title,
        row.goal_type.name(),
        format_goal_value(row.goal_type, row.current, unit),
        format_goal_value(row.goal_type, row.target, unit),
        format_percent(row.percent),
        row.days_remaining
    )
}

/// Render the snapshot as a markdown document
pub fn render_markdown(snapshot: &AnalyticsSnapshot) -> String {
    let mut report = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(report, "# Daily Report - {}\n", snapshot.date);

    report.push_str("## Today\n\n");
    let _ = writeln!(
        report,
        "- **Tasks:** {}/{} done ({})",
        snapshot.day.completed,
        snapshot.day.planned,
        format_percent(snapshot.day_completion_percent())
    );
    let _ = writeln!(
        report,
        "- **Daily Cap:** {}{}",
        snapshot.daily_cap,
        if snapshot.day.over_cap { " (over cap)" } else { "" }
    );
    let _ = writeln!(
        report,
        "- **Time:** {} / {} estimated",
        date::format_human(snapshot.day.time_spent),
        date::format_human(snapshot.day.estimated)
    );
    let _ = writeln!(report, "- **Overdue Tasks:** {}\n", snapshot.overdue_tasks);

    report.push_str("## Streaks\n\n");
    let _ = writeln!(report, "- **Current Streak:** {} days", snapshot.current_streak);
    let _ = writeln!(report, "- **Longest Streak:** {} days\n", snapshot.longest_streak);

    let periods = [
        (format!("Week of {}", snapshot.week_start), &snapshot.week),
        (date::month_name(snapshot.date), &snapshot.month),
    ];
    for (title, stats) in periods {
        let _ = writeln!(report, "## {}\n", title);
        let _ = writeln!(report, "- **Tasks Completed:** {}", stats.total_tasks);
        let _ = writeln!(report, "- **Time Spent:** {}", date::format_human(stats.total_time));
        let _ = writeln!(report, "- **Active Days:** {}", stats.active_days);
        let _ = writeln!(report, "- **Average Focus:** {}\n", format_percent(stats.average_focus_score));
    }

    report.push_str("## All Time\n\n");
    let _ = writeln!(report, "- **Tasks Completed:** {}", snapshot.total_tasks_completed);
    let _ = writeln!(report, "- **Time Spent:** {}", date::format_human(snapshot.total_time_spent));
    let _ = writeln!(report, "- **Productive Days:** {}", snapshot.productive_days);
    let _ = writeln!(report, "- **Average Focus:** {}\n", format_percent(snapshot.average_focus_score));

    report.push_str("## Goals\n\n");
    let _ = writeln!(
        report,
        "- **Active:** {}, **Completed:** {}, **Overdue:** {}\n",
        snapshot.active_goals, snapshot.completed_goals, snapshot.overdue_goals
    );
    if !snapshot.goal_progress.is_empty() {
        for row in &snapshot.goal_progress {
            report.push_str(&goal_line(row));
        }
        report.push('\n');
    }

    if !snapshot.tags.is_empty() {
        report.push_str("## Tag Analysis\n\n");

        let mut tags: Vec<_> = snapshot.tags.iter().collect();
        tags.sort_by(|a, b| b.1.time_spent.cmp(&a.1.time_spent));

        for (tag, stats) in tags {
            let _ = writeln!(
                report,
                "- **#{}:** {} tasks ({} done), {}",
                tag,
                stats.task_count,
                stats.done_count,
                date::format_human(stats.time_spent)
            );
        }
        report.push('\n');
    }

    report
}

/// `<dir>/report-YYYY-MM-DD.md`
pub fn default_report_path(dir: &Path, day: NaiveDate) -> PathBuf {
    dir.join(format!("report-{}.md", date::format_day(day)))
}

/// Render and atomically write the report
pub fn write_report(snapshot: &AnalyticsSnapshot, output: &Path) -> Result<PathBuf> {
    let report = render_markdown(snapshot);
    atomic_write(output, &report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    info!(path = %output.display(), "report written");
    Ok(output.to_path_buf())
}
