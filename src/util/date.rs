use crate::domain::WeekStart;
use chrono::{Datelike, Duration, Local, NaiveDate};

/// Storage and display format for calendar days
pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn tomorrow() -> NaiveDate {
    add_days(today(), 1)
}

pub fn yesterday() -> NaiveDate {
    add_days(today(), -1)
}

/// Parse a "YYYY-MM-DD" day
pub fn parse_day(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
}

pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Inclusive on both ends
pub fn is_in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// Whole days from `today` to `target`, negative when the target has passed
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// First day of the week containing `date`
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let day = date.weekday().num_days_from_sunday() as i64;
    let first = week_start.weekday().num_days_from_sunday() as i64;
    let diff = (day - first).rem_euclid(7);
    add_days(date, -diff)
}

/// The seven days of the week containing `date`
pub fn week_dates(date: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let start = start_of_week(date, week_start);
    (0..7).map(|offset| add_days(start, offset)).collect()
}

/// First and last day of a calendar month. `None` for an invalid year/month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month - Duration::days(1)))
}

/// Every day of a calendar month, in order
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    match month_bounds(year, month) {
        Some((first, last)) => first.iter_days().take_while(|d| *d <= last).collect(),
        None => Vec::new(),
    }
}

pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// "Today", "Yesterday", "Tomorrow", or a short date such as "Mar 5".
/// The year is appended when it differs from `today`'s.
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    match days_until(date, today) {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        1 => "Tomorrow".to_string(),
        _ if date.year() != today.year() => date.format("%b %-d, %Y").to_string(),
        _ => date.format("%b %-d").to_string(),
    }
}

/// Clock display: "MM:SS", or "HH:MM:SS" from one hour on
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Human display: "45s", "12m", "2h", "1h 30m"
pub fn format_human(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours == 0 {
        format!("{}m", minutes)
    } else if minutes == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_add_days_crosses_month() {
        assert_eq!(add_days(day("2024-01-31"), 1), day("2024-02-01"));
        assert_eq!(add_days(day("2024-03-01"), -1), day("2024-02-29"));
    }

    #[test]
    fn test_is_in_range_inclusive() {
        let start = day("2024-01-01");
        let end = day("2024-01-07");
        assert!(is_in_range(start, start, end));
        assert!(is_in_range(end, start, end));
        assert!(!is_in_range(day("2024-01-08"), start, end));
    }

    #[test]
    fn test_start_of_week() {
        // 2024-03-06 is a Wednesday
        let wednesday = day("2024-03-06");
        assert_eq!(start_of_week(wednesday, WeekStart::Monday), day("2024-03-04"));
        assert_eq!(start_of_week(wednesday, WeekStart::Sunday), day("2024-03-03"));
        assert_eq!(start_of_week(wednesday, WeekStart::Saturday), day("2024-03-02"));

        // A Sunday with Monday starts belongs to the previous week
        assert_eq!(start_of_week(day("2024-03-10"), WeekStart::Monday), day("2024-03-04"));
    }

    #[test]
    fn test_week_dates() {
        let dates = week_dates(day("2024-03-06"), WeekStart::Monday);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], day("2024-03-04"));
        assert_eq!(dates[6], day("2024-03-10"));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 2),
            Some((day("2024-02-01"), day("2024-02-29")))
        );
        assert_eq!(
            month_bounds(2023, 12),
            Some((day("2023-12-01"), day("2023-12-31")))
        );
        assert_eq!(month_bounds(2024, 13), None);
        assert_eq!(month_dates(2024, 4).len(), 30);
    }

    #[test]
    fn test_relative_label() {
        let today = day("2024-03-06");
        assert_eq!(relative_label(today, today), "Today");
        assert_eq!(relative_label(day("2024-03-05"), today), "Yesterday");
        assert_eq!(relative_label(day("2024-03-07"), today), "Tomorrow");
        assert_eq!(relative_label(day("2024-03-20"), today), "Mar 20");
        assert_eq!(relative_label(day("2023-12-25"), today), "Dec 25, 2023");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3661), "01:01:01");
    }

    #[test]
    fn test_format_human() {
        assert_eq!(format_human(45), "45s");
        assert_eq!(format_human(60), "1m");
        assert_eq!(format_human(7200), "2h");
        assert_eq!(format_human(5400), "1h 30m");
    }

    #[test]
    fn test_names() {
        let date = day("2024-03-06");
        assert_eq!(month_name(date), "March");
        assert_eq!(day_name(date), "Wednesday");
        assert_eq!(days_until(day("2024-03-10"), date), 4);
    }
}
