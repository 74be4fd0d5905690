//! Pure arithmetic behind the earnings summary.
//!
//! Every function takes already-filtered ride records; period selection is
//! done by the caller through repository ranges. Sums and products use
//! checked arithmetic and report overflow as an error.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashSet};

use super::reports_model::{
    DailyEarnings, DaysWorkedPolicy, MonthlyEarnings, PlatformEarnings, RecentRide,
};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::rides::{PlatformTotals, RideRecord};

const ISO_8601_UTC: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn overflow(operation: &str) -> Error {
    Error::Unexpected(format!("Earnings {} overflowed", operation))
}

/// Rounds to display precision, halves away from zero.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Adds `value` into `total` in place.
pub(crate) fn accumulate(total: &mut Decimal, value: Decimal) -> Result<()> {
    *total = total.checked_add(value).ok_or_else(|| overflow("total"))?;
    Ok(())
}

pub(crate) fn checked_sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).ok_or_else(|| overflow("total"))
    })
}

/// Sum of `net_value`; zero for no records.
pub fn sum_net_value(records: &[RideRecord]) -> Result<Decimal> {
    checked_sum(records.iter().map(|r| r.net_value))
}

pub fn count_days_worked(records: &[RideRecord], policy: DaysWorkedPolicy) -> usize {
    match policy {
        DaysWorkedPolicy::CalendarDays => records
            .iter()
            .map(|r| r.ride_date.date())
            .collect::<HashSet<_>>()
            .len(),
        DaysWorkedPolicy::DistinctTimestamps => records
            .iter()
            .map(|r| r.ride_date)
            .collect::<HashSet<_>>()
            .len(),
    }
}

/// `total / days_worked`, or zero when nothing was worked.
pub fn daily_average(total: Decimal, days_worked: usize) -> Result<Decimal> {
    if days_worked == 0 {
        return Ok(Decimal::ZERO);
    }
    total
        .checked_div(Decimal::from(days_worked as u64))
        .map(round_display)
        .ok_or_else(|| overflow("daily average"))
}

pub fn month_projection(daily_average: Decimal, days_in_month: u32) -> Result<Decimal> {
    daily_average
        .checked_mul(Decimal::from(days_in_month))
        .map(round_display)
        .ok_or_else(|| overflow("month projection"))
}

/// Net totals grouped by exact `ride_date`, ascending.
pub fn earnings_by_ride_date(records: &[RideRecord]) -> Result<Vec<DailyEarnings>> {
    let mut totals: BTreeMap<NaiveDateTime, Decimal> = BTreeMap::new();
    for record in records {
        accumulate(totals.entry(record.ride_date).or_default(), record.net_value)?;
    }
    Ok(totals
        .into_iter()
        .map(|(date, total)| DailyEarnings {
            date: date.format(ISO_8601_UTC).to_string(),
            total,
        })
        .collect())
}

/// Net totals grouped by calendar month, ascending by (year, month).
pub fn earnings_by_month(records: &[RideRecord]) -> Result<Vec<MonthlyEarnings>> {
    let mut totals: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for record in records {
        let key = (record.ride_date.year(), record.ride_date.month());
        accumulate(totals.entry(key).or_default(), record.net_value)?;
    }
    Ok(totals
        .into_iter()
        .map(|((year, month), total)| MonthlyEarnings {
            month: format!("{:02}/{}", month, year),
            total,
        })
        .collect())
}

/// Net totals per platform with their share of the overall net total.
///
/// Percentages are zero when the overall total is not positive.
pub fn earnings_by_platform(totals: &[PlatformTotals]) -> Result<Vec<PlatformEarnings>> {
    let grand_total = checked_sum(totals.iter().map(|t| t.net_value))?;
    let mut earnings = totals
        .iter()
        .map(|t| {
            Ok(PlatformEarnings {
                platform: t.platform_name.clone(),
                total: t.net_value,
                percentage: percentage_of(t.net_value, grand_total)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    earnings.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    Ok(earnings)
}

pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_display)
        .ok_or_else(|| overflow("percentage"))
}

/// The `limit` newest records, newest first; ties broken by id.
pub fn recent_rides(records: &[RideRecord], limit: usize) -> Vec<RecentRide> {
    let mut sorted: Vec<&RideRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.ride_date.cmp(&a.ride_date).then_with(|| a.id.cmp(&b.id)));
    sorted
        .into_iter()
        .take(limit)
        .map(|r| RecentRide {
            id: r.id.clone(),
            platform: r.platform_name.clone(),
            value: r.net_value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rides::RideType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(id: &str, platform: &str, date: &str, net: Decimal) -> RideRecord {
        RideRecord {
            id: id.to_string(),
            platform_id: platform.to_lowercase(),
            platform_name: platform.to_string(),
            ride_type: RideType::Ride,
            ride_date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
            gross_value: net,
            fee_value: Decimal::ZERO,
            net_value: net,
        }
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_display(dec!(1.005)), dec!(1.01));
        assert_eq!(round_display(dec!(2.675)), dec!(2.68));
        assert_eq!(round_display(dec!(33.3333)), dec!(33.33));
    }

    #[test]
    fn days_worked_depends_on_policy() {
        let records = vec![
            record("a", "Uber", "2024-03-01 08:00:00", dec!(10)),
            record("b", "Uber", "2024-03-01 18:00:00", dec!(10)),
            record("c", "iFood", "2024-03-01 18:00:00", dec!(10)),
            record("d", "Uber", "2024-03-02 09:00:00", dec!(10)),
        ];
        assert_eq!(count_days_worked(&records, DaysWorkedPolicy::CalendarDays), 2);
        assert_eq!(
            count_days_worked(&records, DaysWorkedPolicy::DistinctTimestamps),
            3
        );
    }

    fn platform(name: &str, net: Decimal) -> PlatformTotals {
        PlatformTotals {
            platform_name: name.to_string(),
            gross_value: net,
            net_value: net,
            ride_count: 1,
        }
    }

    #[test]
    fn daily_average_is_zero_without_worked_days() {
        assert_eq!(daily_average(dec!(0), 0).unwrap(), Decimal::ZERO);
        assert_eq!(daily_average(dec!(100), 3).unwrap(), dec!(33.33));
    }

    #[test]
    fn projection_uses_rounded_average() {
        assert_eq!(month_projection(dec!(40.00), 31).unwrap(), dec!(1240.00));
        assert_eq!(month_projection(dec!(33.33), 30).unwrap(), dec!(999.90));
    }

    #[test]
    fn projection_overflow_is_an_error() {
        let average = daily_average(dec!(3000000000000000000000000000), 1).unwrap();

        let err = month_projection(average, 31).unwrap_err();

        assert!(matches!(err, Error::Unexpected(_)));
        assert!(err.to_string().contains("month projection overflowed"));
    }

    #[test]
    fn sum_overflow_is_an_error() {
        let records = vec![
            record("a", "Uber", "2024-03-01 08:00:00", Decimal::MAX),
            record("b", "Uber", "2024-03-02 08:00:00", Decimal::MAX),
        ];

        assert!(matches!(sum_net_value(&records), Err(Error::Unexpected(_))));
        assert!(matches!(
            earnings_by_ride_date(&records),
            Err(Error::Unexpected(_))
        ));
        assert!(matches!(earnings_by_month(&records), Err(Error::Unexpected(_))));
        assert!(matches!(
            earnings_by_platform(&[platform("Uber", Decimal::MAX), platform("99", Decimal::MAX)]),
            Err(Error::Unexpected(_))
        ));
        assert_eq!(sum_net_value(&records[..1]).unwrap(), Decimal::MAX);
    }

    #[test]
    fn groups_by_exact_timestamp_in_ascending_order() {
        let records = vec![
            record("a", "Uber", "2024-03-02 09:00:00", dec!(5)),
            record("b", "Uber", "2024-03-01 08:00:00", dec!(10)),
            record("c", "iFood", "2024-03-01 08:00:00", dec!(2.5)),
        ];
        let series = earnings_by_ride_date(&records).unwrap();
        assert_eq!(
            series,
            vec![
                DailyEarnings {
                    date: "2024-03-01T08:00:00.000Z".to_string(),
                    total: dec!(12.5),
                },
                DailyEarnings {
                    date: "2024-03-02T09:00:00.000Z".to_string(),
                    total: dec!(5),
                },
            ]
        );
    }

    #[test]
    fn monthly_series_sorts_across_year_boundary() {
        let records = vec![
            record("a", "Uber", "2025-01-10 10:00:00", dec!(7)),
            record("b", "Uber", "2024-12-20 10:00:00", dec!(3)),
            record("c", "Uber", "2024-11-05 10:00:00", dec!(1)),
            record("d", "Uber", "2025-01-11 10:00:00", dec!(1)),
        ];
        let months: Vec<(String, Decimal)> = earnings_by_month(&records)
            .unwrap()
            .into_iter()
            .map(|m| (m.month, m.total))
            .collect();
        assert_eq!(
            months,
            vec![
                ("11/2024".to_string(), dec!(1)),
                ("12/2024".to_string(), dec!(3)),
                ("01/2025".to_string(), dec!(8)),
            ]
        );
    }

    #[test]
    fn platform_distribution_sums_to_one_hundred() {
        let totals = vec![
            platform("Uber", dec!(10)),
            platform("iFood", dec!(10)),
            platform("99", dec!(10)),
        ];
        let platforms = earnings_by_platform(&totals).unwrap();
        assert_eq!(platforms.len(), 3);
        let total: Decimal = platforms.iter().map(|p| p.percentage).sum();
        assert_eq!(total, dec!(99.99));
        assert!(platforms.iter().all(|p| p.percentage == dec!(33.33)));
        // Equal totals fall back to name order.
        assert_eq!(platforms[0].platform, "99");
    }

    #[test]
    fn platform_percentages_are_zero_without_earnings() {
        let totals = vec![platform("Uber", dec!(0)), platform("iFood", dec!(0))];
        let platforms = earnings_by_platform(&totals).unwrap();
        assert_eq!(platforms.len(), 2);
        assert!(platforms.iter().all(|p| p.percentage.is_zero()));
    }

    #[test]
    fn recent_rides_are_newest_first_and_capped() {
        let records: Vec<RideRecord> = (1..=7)
            .map(|day| {
                let date = NaiveDate::from_ymd_opt(2024, 3, day)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap();
                RideRecord {
                    ride_date: date,
                    ..record(&format!("r{day}"), "Uber", "2024-01-01 00:00:00", dec!(1))
                }
            })
            .collect();

        let recent = recent_rides(&records, 5);
        let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r7", "r6", "r5", "r4", "r3"]);
        assert_eq!(recent_rides(&records[..2], 5).len(), 2);
    }
}
