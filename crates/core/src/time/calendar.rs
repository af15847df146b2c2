use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::facts::IntervalUnit;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Infallible for month 1..=12; callers pass chrono-derived months.
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid first of month");
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid first of next month");
    next_first.signed_duration_since(first).num_days() as u32
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let day = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), day).expect("valid month end")
}

/// Month arithmetic with the day-of-month clamped to the target month's
/// length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("valid clamped date")
}

/// Budget periods are keyed by calendar month as `YYYY-MM`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn month_ends_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cur = month_end(from);
    while cur <= to {
        out.push(cur);
        cur = month_end(cur + Duration::days(1));
    }
    out
}

/// Calendar-quarter ends (Mar/Jun/Sep/Dec) within `[from, to]`.
pub fn quarter_ends_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    month_ends_between(from, to)
        .into_iter()
        .filter(|d| d.month() % 3 == 0)
        .collect()
}

/// Fiscal year ends within `[from, to]` for a `(month, day)` profile entry.
/// The day is clamped per year, so a Feb 29 year-end stays valid.
pub fn fiscal_year_ends_between(
    from: NaiveDate,
    to: NaiveDate,
    month: u32,
    day: u32,
) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    if !(1..=12).contains(&month) {
        return out;
    }
    for year in (from.year() - 1)..=(to.year() + 1) {
        let clamped_day = day.clamp(1, days_in_month(year, month));
        let candidate =
            NaiveDate::from_ymd_opt(year, month, clamped_day).expect("valid fiscal year end");
        if candidate >= from && candidate <= to {
            out.push(candidate);
        }
    }
    out
}

/// The k-th occurrence of a recurring cadence, anchored at `anchor` so that
/// month-end clamping never accumulates drift across steps.
pub fn occurrence(anchor: NaiveDate, unit: IntervalUnit, count: u32, k: u32) -> NaiveDate {
    let steps = (count * k) as i32;
    match unit {
        IntervalUnit::Week => anchor + Duration::days(7 * steps as i64),
        IntervalUnit::Month => add_months(anchor, steps),
        IntervalUnit::Year => add_months(anchor, 12 * steps),
    }
}
