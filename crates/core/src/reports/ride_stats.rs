//! Per-month and per-platform ride statistics.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::reports_calculator::{
    accumulate, checked_sum, daily_average, percentage_of, round_display,
};
use super::reports_model::ReportPeriod;
use crate::errors::Result;
use crate::rides::{MonthTotals, PlatformTotals, RideRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// `YYYY-MM`
    pub month: String,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_fees: Decimal,
    pub ride_count: usize,
    pub average_per_day: Decimal,
    pub average_per_ride: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub platform: String,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub ride_count: usize,
    /// Share of the overall gross value.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Folds records into per-platform totals, ordered by platform name.
///
/// Takes fallible items so repositories can stream rows straight from a
/// cursor; the first error stops the fold.
pub fn total_by_platform<I>(records: I) -> Result<Vec<PlatformTotals>>
where
    I: IntoIterator<Item = Result<RideRecord>>,
{
    let mut platforms: BTreeMap<String, PlatformTotals> = BTreeMap::new();
    for record in records {
        let record = record?;
        let totals = platforms
            .entry(record.platform_name.clone())
            .or_insert_with(|| PlatformTotals {
                platform_name: record.platform_name.clone(),
                gross_value: Decimal::ZERO,
                net_value: Decimal::ZERO,
                ride_count: 0,
            });
        accumulate(&mut totals.gross_value, record.gross_value)?;
        accumulate(&mut totals.net_value, record.net_value)?;
        totals.ride_count += 1;
    }
    Ok(platforms.into_values().collect())
}

/// Folds records into per-month totals, oldest month first.
pub fn total_by_month<I>(records: I) -> Result<Vec<MonthTotals>>
where
    I: IntoIterator<Item = Result<RideRecord>>,
{
    let mut months: BTreeMap<(i32, u32), (MonthTotals, HashSet<NaiveDate>)> = BTreeMap::new();
    for record in records {
        let record = record?;
        let date = record.ride_date.date();
        let (totals, days) = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| {
                (
                    MonthTotals {
                        year: date.year(),
                        month: date.month(),
                        gross_value: Decimal::ZERO,
                        fee_value: Decimal::ZERO,
                        net_value: Decimal::ZERO,
                        ride_count: 0,
                        days_worked: 0,
                    },
                    HashSet::new(),
                )
            });
        accumulate(&mut totals.gross_value, record.gross_value)?;
        accumulate(&mut totals.fee_value, record.fee_value)?;
        accumulate(&mut totals.net_value, record.net_value)?;
        totals.ride_count += 1;
        days.insert(date);
    }
    Ok(months
        .into_values()
        .map(|(totals, days)| MonthTotals {
            days_worked: days.len(),
            ..totals
        })
        .collect())
}

/// Monthly statistics, newest month first.
pub fn calculate_monthly_stats(months: &[MonthTotals]) -> Result<Vec<MonthlyStats>> {
    let mut stats = months
        .iter()
        .map(|m| {
            Ok(MonthlyStats {
                month: format!("{}-{:02}", m.year, m.month),
                total_gross: m.gross_value,
                total_net: m.net_value,
                total_fees: m.fee_value,
                ride_count: m.ride_count,
                average_per_day: daily_average(m.net_value, m.days_worked)?,
                average_per_ride: daily_average(m.net_value, m.ride_count)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    stats.sort_by(|a, b| b.month.cmp(&a.month));
    Ok(stats)
}

/// Platform statistics, largest gross first.
pub fn calculate_platform_stats(platforms: &[PlatformTotals]) -> Result<Vec<PlatformStats>> {
    let total_gross = checked_sum(platforms.iter().map(|p| p.gross_value))?;
    let mut stats = platforms
        .iter()
        .map(|p| {
            Ok(PlatformStats {
                platform: p.platform_name.clone(),
                total_gross: p.gross_value,
                total_net: p.net_value,
                ride_count: p.ride_count,
                percentage: percentage_of(p.gross_value, total_gross)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    stats.sort_by(|a, b| {
        b.total_gross
            .cmp(&a.total_gross)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    Ok(stats)
}

/// One point per day of `period`, zero when nothing was earned that day.
///
/// Records outside the period are ignored.
pub fn daily_series_for_month(
    records: &[RideRecord],
    period: &ReportPeriod,
) -> Result<Vec<DailyPoint>> {
    let mut totals: BTreeMap<NaiveDate, Decimal> =
        period.days().map(|day| (day, Decimal::ZERO)).collect();
    for record in records {
        if let Some(total) = totals.get_mut(&record.ride_date.date()) {
            accumulate(total, record.net_value)?;
        }
    }
    Ok(totals
        .into_iter()
        .map(|(date, total)| DailyPoint {
            date,
            total: round_display(total),
        })
        .collect())
}
