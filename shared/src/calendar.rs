//! Calendar aggregation: training streaks and the month view
//!
//! A streak is the run of consecutive days, ending at a given day, that each
//! have at least one record. The walk backwards is capped so a long history
//! never turns into an unbounded scan; the cap exists for display and is not
//! a limit on how long anyone can train.

use crate::errors::{CalcError, CalcResult};
use crate::models::Dated;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Longest streak the calendar reports
pub const STREAK_CAP: u32 = 30;

/// Cells in the month view (six weeks)
pub const MONTH_GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub streak_cap: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            streak_cap: STREAK_CAP,
        }
    }
}

// ============================================================================
// Streaks
// ============================================================================

fn streak_in(days: &HashSet<NaiveDate>, target_date: NaiveDate, cap: u32) -> u32 {
    let mut count = 0;
    let mut current = target_date;

    while count < cap && days.contains(&current) {
        count += 1;
        match current.pred_opt() {
            Some(previous) => current = previous,
            None => break,
        }
    }

    trace!(%target_date, streak = count, "walked streak");
    count
}

/// Consecutive days with records, ending at `target_date`, at most 30
pub fn consecutive_days_ending_at<R: Dated>(records: &[R], target_date: NaiveDate) -> u32 {
    consecutive_days_ending_at_capped(records, target_date, STREAK_CAP)
}

/// [`consecutive_days_ending_at`] with an explicit cap
pub fn consecutive_days_ending_at_capped<R: Dated>(
    records: &[R],
    target_date: NaiveDate,
    cap: u32,
) -> u32 {
    if records.is_empty() {
        return 0;
    }
    let days: HashSet<NaiveDate> = records.iter().map(Dated::day).collect();
    streak_in(&days, target_date, cap)
}

/// Calendar day of a date or timestamp string
///
/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS` timestamp, or RFC 3339.
/// Timestamps keep their own calendar day; no timezone conversion happens.
pub fn parse_day(value: &str) -> CalcResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .map_err(|_| CalcError::InvalidDate(value.to_string()))
}

/// Shading bucket for a streak length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    /// No record that day
    Rest,
    /// 1–2 days in a row
    Light,
    /// 3–6 days
    Medium,
    /// A week or more
    Strong,
}

impl StreakTier {
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            0 => StreakTier::Rest,
            1..=2 => StreakTier::Light,
            3..=6 => StreakTier::Medium,
            _ => StreakTier::Strong,
        }
    }
}

// ============================================================================
// Month view
// ============================================================================

/// One cell of the month view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub record_count: usize,
    /// Zero outside the displayed month
    pub streak: u32,
    pub tier: StreakTier,
}

impl CalendarDay {
    pub fn has_records(&self) -> bool {
        self.record_count > 0
    }
}

/// Six-week, Sunday-first grid around `year`/`month`
///
/// Leading cells come from the previous month and trailing cells from the
/// next; only days of the displayed month carry record counts and streaks.
/// Months whose grid would run past the representable date range are
/// rejected like invalid months.
pub fn month_grid<R: Dated>(
    records: &[R],
    year: i32,
    month: u32,
    settings: &CalendarSettings,
) -> CalcResult<Vec<CalendarDay>> {
    let out_of_range = || CalcError::InvalidInput(format!("no such month: {}-{:02}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let leading = first.weekday().num_days_from_sunday() as i64;
    let start = first
        .checked_sub_signed(Duration::days(leading))
        .ok_or_else(out_of_range)?;

    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.day()).or_default() += 1;
    }
    let days: HashSet<NaiveDate> = counts.keys().copied().collect();

    (0..MONTH_GRID_CELLS as i64)
        .map(|offset| {
            let date = start
                .checked_add_signed(Duration::days(offset))
                .ok_or_else(out_of_range)?;
            let is_current_month = date.year() == year && date.month() == month;
            let record_count = if is_current_month {
                counts.get(&date).copied().unwrap_or(0)
            } else {
                0
            };
            let streak = if record_count > 0 {
                streak_in(&days, date, settings.streak_cap)
            } else {
                0
            };

            Ok(CalendarDay {
                date,
                is_current_month,
                record_count,
                streak,
                tier: StreakTier::from_streak(streak),
            })
        })
        .collect()
}
