use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use history_types::DayCell;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Column headers of the month grid, Sunday first
pub const MONTH_WEEKDAY_HEADERS: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .with_context(|| format!("Invalid date key: {}", key))
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "SUN",
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
    }
}

/// Sunday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Saturday on or after `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_sunday() as u64;
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        // December of chrono's last representable year
        .unwrap_or_else(|| date.with_day(31).unwrap_or(date))
}

/// Moves the week anchor by `delta` weeks. Saturates at the ends of chrono's range.
pub fn shift_week(reference: NaiveDate, delta: i32) -> NaiveDate {
    let days = Days::new(7 * delta.unsigned_abs() as u64);
    let shifted = if delta >= 0 {
        reference.checked_add_days(days)
    } else {
        reference.checked_sub_days(days)
    };
    shifted.unwrap_or(reference)
}

/// Moves by `delta` calendar months, rolling the year over and clamping the day
/// to the target month's length (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    };
    shifted.unwrap_or(reference)
}

pub fn week_title(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

pub fn month_title(reference: NaiveDate) -> String {
    reference.format("%Y年%m月").to_string()
}

fn day_cell(
    date: NaiveDate,
    selected: NaiveDate,
    in_month: Option<bool>,
    has_games: &impl Fn(&str) -> bool,
) -> DayCell {
    let key = date_key(date);
    DayCell {
        day: date.day(),
        weekday_label: weekday_label(date.weekday()).to_string(),
        is_selected: date == selected,
        is_in_current_month: in_month,
        has_games: has_games(&key),
        date_key: key,
    }
}

/// The seven days of the Sunday-first week containing `reference`
pub fn build_week(
    reference: NaiveDate,
    selected: NaiveDate,
    has_games: impl Fn(&str) -> bool,
) -> Vec<DayCell> {
    start_of_week(reference)
        .iter_days()
        .take(7)
        .map(|date| day_cell(date, selected, None, &has_games))
        .collect()
}

/// Every day from the week start of the month's first day through the week end
/// of its last day. Yields 28, 35 or 42 cells.
pub fn build_month(
    month_reference: NaiveDate,
    selected: NaiveDate,
    has_games: impl Fn(&str) -> bool,
) -> Vec<DayCell> {
    let grid_start = start_of_week(start_of_month(month_reference));
    let grid_end = end_of_week(end_of_month(month_reference));

    grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| {
            let in_month =
                date.year() == month_reference.year() && date.month() == month_reference.month();
            day_cell(date, selected, Some(in_month), &has_games)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn no_games(_: &str) -> bool {
        false
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-03-15 is a Saturday
        let week = build_week(date(2025, 3, 15), date(2025, 3, 15), no_games);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date_key, "2025-03-09");
        assert_eq!(week[0].weekday_label, "SUN");
        assert_eq!(week[6].date_key, "2025-03-15");
        assert_eq!(week[6].weekday_label, "SAT");
        assert!(week[6].is_selected);
        assert!(week.iter().all(|cell| cell.is_in_current_month.is_none()));
    }

    #[test]
    fn test_week_days_are_consecutive_for_a_whole_year() {
        let mut reference = date(2024, 1, 1);
        while reference.year() == 2024 {
            let week = build_week(reference, reference, no_games);
            assert_eq!(week.len(), 7);
            let dates: Vec<NaiveDate> = week
                .iter()
                .map(|cell| parse_date_key(&cell.date_key).unwrap())
                .collect();
            for pair in dates.windows(2) {
                assert_eq!(pair[0].succ_opt().unwrap(), pair[1]);
            }
            assert!(dates.contains(&reference));
            assert_eq!(week.iter().filter(|cell| cell.is_selected).count(), 1);
            reference = reference.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_week_without_selected_date() {
        let week = build_week(date(2025, 3, 15), date(2025, 3, 20), no_games);
        assert_eq!(week.iter().filter(|cell| cell.is_selected).count(), 0);
    }

    #[test]
    fn test_week_crossing_year_boundary() {
        // 2025-01-01 is a Wednesday
        let week = build_week(date(2025, 1, 1), date(2024, 12, 29), no_games);
        assert_eq!(week[0].date_key, "2024-12-29");
        assert!(week[0].is_selected);
        assert_eq!(week[6].date_key, "2025-01-04");
    }

    #[test]
    fn test_month_grid_for_march_2025() {
        let days = build_month(date(2025, 3, 1), date(2025, 3, 15), no_games);
        // March 2025 starts on Saturday and ends on Monday
        assert_eq!(days.len(), 42);
        assert_eq!(days[0].date_key, "2025-02-23");
        assert_eq!(days[41].date_key, "2025-04-05");
        assert_eq!(days[0].is_in_current_month, Some(false));
        assert_eq!(days[6].is_in_current_month, Some(true));
        assert_eq!(days.iter().filter(|cell| cell.is_selected).count(), 1);
    }

    #[test]
    fn test_month_grid_of_28_cells() {
        // February 2015 starts on Sunday and has 28 days
        let days = build_month(date(2015, 2, 10), date(2015, 2, 10), no_games);
        assert_eq!(days.len(), 28);
        assert!(days.iter().all(|cell| cell.is_in_current_month == Some(true)));
    }

    #[test]
    fn test_month_grid_properties_over_many_months() {
        let mut reference = date(2023, 1, 1);
        for _ in 0..36 {
            let days = build_month(reference, reference, no_games);
            assert_eq!(days.len() % 7, 0);
            assert!((28..=42).contains(&days.len()));
            assert_eq!(days[0].weekday_label, "SUN");

            let in_month: HashSet<&str> = days
                .iter()
                .filter(|cell| cell.is_in_current_month == Some(true))
                .map(|cell| cell.date_key.as_str())
                .collect();
            let expected: HashSet<String> = start_of_month(reference)
                .iter_days()
                .take_while(|d| d.month() == reference.month())
                .map(date_key)
                .collect();
            assert_eq!(in_month.len(), expected.len());
            for key in &expected {
                assert!(in_month.contains(key.as_str()));
            }

            reference = shift_month(reference, 1);
        }
    }

    #[test]
    fn test_has_games_lookup() {
        let keys: HashSet<&str> = ["2025-03-15", "2025-03-20"].into_iter().collect();
        let days = build_month(date(2025, 3, 1), date(2025, 3, 15), |key| keys.contains(key));
        for cell in &days {
            assert_eq!(cell.has_games, keys.contains(cell.date_key.as_str()));
        }
        assert_eq!(days.iter().filter(|cell| cell.has_games).count(), 2);
    }

    #[test]
    fn test_shift_month_rolls_over_years() {
        assert_eq!(shift_month(date(2025, 1, 15), -1), date(2024, 12, 15));
        assert_eq!(shift_month(date(2024, 12, 1), 1), date(2025, 1, 1));
        assert_eq!(shift_month(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(shift_month(date(2024, 3, 31), -1), date(2024, 2, 29));
    }

    #[test]
    fn test_shift_week() {
        assert_eq!(shift_week(date(2025, 3, 15), 1), date(2025, 3, 22));
        assert_eq!(shift_week(date(2025, 1, 3), -1), date(2024, 12, 27));
        assert_eq!(shift_week(date(2025, 1, 3), 0), date(2025, 1, 3));
    }

    #[test]
    fn test_titles() {
        assert_eq!(week_title(date(2025, 3, 15)), "March 2025");
        assert_eq!(month_title(date(2025, 3, 1)), "2025年03月");
    }

    #[test]
    fn test_date_key_parsing() {
        assert_eq!(parse_date_key("2025-03-15").unwrap(), date(2025, 3, 15));
        assert!(parse_date_key("2025-02-30").is_err());
        assert!(parse_date_key("yesterday").is_err());
        assert_eq!(date_key(date(2025, 3, 5)), "2025-03-05");
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(date(2024, 2, 3)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2024, 12, 3)), date(2024, 12, 31));
    }
}
