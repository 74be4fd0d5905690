//! Report domain models.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::reports_errors::ReportError;
use crate::constants::MIN_REFERENCE_YEAR;
use crate::errors::{Error, Result};
use crate::rides::RideDateRange;

/// Optional reference period requested by the caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl SummaryQuery {
    pub fn for_month(month: u32, year: i32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }
}

/// How worked days are counted for the daily average.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DaysWorkedPolicy {
    /// Distinct calendar dates of `ride_date`.
    #[default]
    CalendarDays,
    /// Distinct full `ride_date` timestamps; two rides on the same day at
    /// different times count as two days.
    DistinctTimestamps,
}

impl FromStr for DaysWorkedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" | "calendar_days" | "days" => Ok(DaysWorkedPolicy::CalendarDays),
            "timestamps" | "distinct_timestamps" => Ok(DaysWorkedPolicy::DistinctTimestamps),
            other => Err(Error::invalid_input(format!(
                "Unknown days-worked policy '{}'",
                other
            ))),
        }
    }
}

/// A validated reference month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    first_day: NaiveDate,
}

impl ReportPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        let invalid = || Error::from(ReportError::InvalidPeriod { month, year });
        if !(1..=12).contains(&month) || year < MIN_REFERENCE_YEAR {
            return Err(invalid());
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        // The year window needs January 1st of the following year to exist.
        NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid)?;
        Ok(Self { first_day })
    }

    /// Resolves the caller's query, filling missing parts from `now`.
    pub fn resolve(query: SummaryQuery, now: NaiveDateTime) -> Result<Self> {
        Self::new(
            query.month.unwrap_or_else(|| now.month()),
            query.year.unwrap_or_else(|| now.year()),
        )
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    fn next_month_first_day(&self) -> NaiveDate {
        self.first_day + Months::new(1)
    }

    /// First day 00:00:00 through the last day 23:59:59 (inclusive), as a half-open range.
    pub fn month_range(&self) -> RideDateRange {
        RideDateRange::between(
            start_of_day(self.first_day),
            start_of_day(self.next_month_first_day()),
        )
    }

    /// Jan 1 00:00:00 through Dec 31 23:59:59 (inclusive), as a half-open range.
    pub fn year_range(&self) -> RideDateRange {
        let start = self.first_day.with_month(1).unwrap_or(self.first_day);
        RideDateRange::between(start_of_day(start), start_of_day(start + Months::new(12)))
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next_month_first_day() - self.first_day).num_days() as u32
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day.iter_days().take(self.days_in_month() as usize)
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// One point of the trailing 30-day series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEarnings {
    /// ISO-8601 timestamp of the grouped `ride_date`.
    pub date: String,
    pub total: Decimal,
}

/// One point of the trailing 12-month series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEarnings {
    /// `MM/YYYY`
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEarnings {
    pub platform: String,
    pub total: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentRide {
    pub id: String,
    pub platform: String,
    pub value: Decimal,
}

/// Dashboard summary for one user and one reference month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub month_total: Decimal,
    pub year_total: Decimal,
    pub daily_average: Decimal,
    pub month_projection: Decimal,
    pub earnings_last_30_days: Vec<DailyEarnings>,
    pub earnings_last_12_months: Vec<MonthlyEarnings>,
    pub earnings_by_platform: Vec<PlatformEarnings>,
    pub recent_rides: Vec<RecentRide>,
}
