use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use dofive::coordination;
use dofive::persistence::{data_dir, init_local_data_dir};
use dofive::report::{self, AnalyticsSnapshot};
use dofive::util::{date, HeatmapScale};
use dofive::AppContext;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dofive")]
#[command(about = "Plan five things a day, track the time, watch the streak grow", long_about = None)]
struct Cli {
    /// Data directory. Defaults to a local .dofive, then ~/.dofive
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .dofive directory in the current directory
    Init,
    /// List today's tasks in planned order
    Today,
    /// Generate an analytics report
    Report {
        /// Date to report on (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a month's activity heatmap
    Heatmap {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Refresh today's history row from the task list and save
    Sync,
}

fn init_logging() {
    if let Ok(filter) = std::env::var("DOFIVE_LOG") {
        let filter = if filter.trim().is_empty() {
            "dofive=debug".to_string()
        } else {
            filter
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .init();
    }
}

fn parse_date_arg(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(value) => date::parse_day(value)
            .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e)),
        None => Ok(date::today()),
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Init => {
            let current_dir = std::env::current_dir().context("Could not determine current directory")?;
            let dir = init_local_data_dir(&current_dir)?;
            println!("Initialized dofive directory: {}", dir.display());
            println!();
            println!("dofive will now use this local directory for its data.");
            Ok(())
        }
        command => run(command, cli.data_dir),
    }
}

fn run(command: Commands, data_dir_override: Option<PathBuf>) -> Result<()> {
    let dir = data_dir(data_dir_override.as_deref())?;
    let mut ctx = AppContext::open(&dir)?;

    match command {
        Commands::Init | Commands::Today => print_today(&ctx),
        Commands::Report { date, output } => {
            let report_date = parse_date_arg(date.as_deref())?;
            let output = output.unwrap_or_else(|| report::default_report_path(&dir, report_date));

            println!("Generating report for {}...", report_date);
            let snapshot = AnalyticsSnapshot::collect(
                &ctx.tasks,
                &ctx.goals,
                &ctx.history,
                ctx.settings.get(),
                report_date,
            );
            let path = report::write_report(&snapshot, &output)?;
            println!("Report generated: {}", path.display());
        }
        Commands::Heatmap { year, month } => {
            let today = date::today();
            print_heatmap(&ctx, year.unwrap_or(today.year()), month.unwrap_or(today.month()))?;
        }
        Commands::Sync => {
            let today = date::today();
            coordination::refresh_today_progress(&ctx.tasks, &mut ctx.history, today);
            ctx.history.recompute_streaks();
            ctx.save_if_needed()?;
            let row = ctx.history.get(today);
            println!(
                "Synced {}: {} completed, {} tracked, streak {}",
                today,
                row.map_or(0, |r| r.tasks_completed),
                date::format_human(row.map_or(0, |r| r.time_spent)),
                row.map_or(0, |r| r.streak_count)
            );
        }
    }

    Ok(())
}

fn print_today(ctx: &AppContext) {
    let today = date::today();
    let cap = ctx.settings.get().max_daily_tasks as usize;
    let show_completed = ctx.settings.get().show_completed_tasks;
    let tasks = ctx.tasks.by_date(today);

    println!("{} ({})", date::relative_label(today, today), date::format_day(today));
    if tasks.is_empty() {
        println!("  nothing planned");
        return;
    }

    for (index, task) in tasks.iter().enumerate() {
        if index == cap {
            println!("  -- over the daily cap of {} --", cap);
        }
        if task.is_completed() && !show_completed {
            continue;
        }
        let mark = if task.is_completed() { "x" } else { " " };
        let estimate = task
            .estimated_time
            .map(|e| format!(" / {}", date::format_human(e)))
            .unwrap_or_default();
        println!(
            "  [{}] {} {}  ({}{})",
            mark,
            task.priority,
            task.title,
            date::format_human(task.time_spent),
            estimate
        );
    }
}

fn print_heatmap(ctx: &AppContext, year: i32, month: u32) -> Result<()> {
    let (first, _) = date::month_bounds(year, month)
        .with_context(|| format!("Invalid month: {}-{}", year, month))?;
    let week_start = ctx.settings.get().week_starts_on;
    let cells = ctx.history.heatmap_for_month(year, month, &HeatmapScale::default());

    println!("{} {}", date::month_name(first), year);
    let header: Vec<String> = date::week_dates(first, week_start)
        .iter()
        .map(|d| date::day_name(*d).chars().take(2).collect())
        .collect();
    println!("{}", header.join(" "));

    let lead = date::days_until(first, date::start_of_week(first, week_start)) as usize;
    let mut line = "   ".repeat(lead);
    for (day, level) in cells {
        line.push_str(&format!("{}  ", level.glyph()));
        if date::add_days(day, 1) == date::start_of_week(date::add_days(day, 1), week_start) {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    Ok(())
}
