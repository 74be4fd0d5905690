//! Tests for the earnings summary service.

use super::*;
use crate::errors::{DatabaseError, Error, Result};
use crate::rides::{
    MonthTotals, NewRide, PlatformTotals, Ride, RideDateRange, RideFilter, RideRecord,
    RideRepositoryTrait, RideType,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockRideRepository {
    records: Vec<(String, RideRecord)>,
    fail_reads: bool,
    requested_ranges: Mutex<Vec<RideDateRange>>,
}

impl MockRideRepository {
    fn with_rides(rides: Vec<(&str, RideRecord)>) -> Self {
        Self {
            records: rides
                .into_iter()
                .map(|(user, record)| (user.to_string(), record))
                .collect(),
            ..Default::default()
        }
    }

    fn for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a RideRecord> + 'a {
        self.records
            .iter()
            .filter(move |(owner, _)| owner == user_id)
            .map(|(_, record)| record)
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RideRepositoryTrait for MockRideRepository {
    async fn create(&self, _user_id: &str, _new_ride: NewRide) -> Result<Ride> {
        unimplemented!()
    }

    async fn delete(&self, _user_id: &str, _ride_id: &str) -> Result<usize> {
        unimplemented!()
    }

    fn list(&self, _user_id: &str, _filter: &RideFilter) -> Result<Vec<Ride>> {
        unimplemented!()
    }

    async fn load_records(&self, user_id: &str, range: RideDateRange) -> Result<Vec<RideRecord>> {
        self.check_reads()?;
        self.requested_ranges.lock().unwrap().push(range);
        Ok(self
            .for_user(user_id)
            .filter(|r| range.contains(&r.ride_date))
            .cloned()
            .collect())
    }

    async fn load_recent_records(&self, user_id: &str, limit: usize) -> Result<Vec<RideRecord>> {
        self.check_reads()?;
        let mut records: Vec<RideRecord> = self.for_user(user_id).cloned().collect();
        records.sort_by(|a, b| b.ride_date.cmp(&a.ride_date));
        records.truncate(limit);
        Ok(records)
    }

    async fn load_platform_totals(&self, user_id: &str) -> Result<Vec<PlatformTotals>> {
        self.check_reads()?;
        total_by_platform(self.for_user(user_id).cloned().map(Ok))
    }

    async fn load_month_totals(&self, user_id: &str) -> Result<Vec<MonthTotals>> {
        self.check_reads()?;
        total_by_month(self.for_user(user_id).cloned().map(Ok))
    }
}

// ============================================================================
// Helpers
// ============================================================================

const USER: &str = "user-1";

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn ride(id: &str, platform: &str, date: &str, net: Decimal) -> RideRecord {
    RideRecord {
        id: id.to_string(),
        platform_id: platform.to_lowercase(),
        platform_name: platform.to_string(),
        ride_type: RideType::Ride,
        ride_date: at(date),
        gross_value: net,
        fee_value: Decimal::ZERO,
        net_value: net,
    }
}

fn service(repository: MockRideRepository) -> ReportService {
    ReportService::new(Arc::new(repository), DaysWorkedPolicy::CalendarDays)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn march_example_produces_expected_totals() {
    let repository = MockRideRepository::with_rides(vec![
        (USER, ride("r1", "Uber", "2024-03-01 10:00:00", dec!(50))),
        (USER, ride("r2", "iFood", "2024-03-02 14:00:00", dec!(30))),
    ]);

    let summary = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::for_month(3, 2024), at("2024-03-15 12:00:00"))
        .await
        .unwrap();

    assert_eq!(summary.month_total, dec!(80));
    assert_eq!(summary.year_total, dec!(80));
    assert_eq!(summary.daily_average, dec!(40.00));
    assert_eq!(summary.month_projection, dec!(1240.00));
    assert_eq!(summary.earnings_last_30_days.len(), 2);
    assert_eq!(summary.earnings_last_30_days[0].date, "2024-03-01T10:00:00.000Z");
    assert_eq!(summary.earnings_last_12_months.len(), 1);
    assert_eq!(summary.earnings_last_12_months[0].month, "03/2024");
    assert_eq!(summary.earnings_last_12_months[0].total, dec!(80));
    assert_eq!(summary.recent_rides[0].id, "r2");
    assert_eq!(summary.recent_rides[1].id, "r1");
}

#[tokio::test]
async fn empty_history_yields_zeros() {
    let summary = service(MockRideRepository::default())
        .get_earnings_summary_at(USER, SummaryQuery::default(), at("2024-03-15 12:00:00"))
        .await
        .unwrap();

    assert_eq!(summary.month_total, Decimal::ZERO);
    assert_eq!(summary.year_total, Decimal::ZERO);
    assert_eq!(summary.daily_average, Decimal::ZERO);
    assert_eq!(summary.month_projection, Decimal::ZERO);
    assert!(summary.earnings_last_30_days.is_empty());
    assert!(summary.earnings_last_12_months.is_empty());
    assert!(summary.earnings_by_platform.is_empty());
    assert!(summary.recent_rides.is_empty());
}

#[tokio::test]
async fn single_platform_gets_the_whole_share() {
    let rides = (1..=10)
        .map(|day| {
            (
                USER,
                ride(
                    &format!("r{day}"),
                    "Uber",
                    &format!("2024-03-{:02} 09:00:00", day),
                    dec!(12.5),
                ),
            )
        })
        .collect();

    let summary = service(MockRideRepository::with_rides(rides))
        .get_earnings_summary_at(USER, SummaryQuery::for_month(3, 2024), at("2024-03-20 12:00:00"))
        .await
        .unwrap();

    assert_eq!(summary.earnings_by_platform.len(), 1);
    assert_eq!(summary.earnings_by_platform[0].platform, "Uber");
    assert_eq!(summary.earnings_by_platform[0].total, dec!(125));
    assert_eq!(summary.earnings_by_platform[0].percentage, dec!(100.00));
    assert_eq!(summary.recent_rides.len(), 5);
    assert_eq!(summary.recent_rides[0].id, "r10");
}

#[tokio::test]
async fn twelve_month_series_is_chronological_across_years() {
    let repository = MockRideRepository::with_rides(vec![
        (USER, ride("a", "Uber", "2025-01-05 10:00:00", dec!(10))),
        (USER, ride("b", "Uber", "2024-12-20 10:00:00", dec!(20))),
        (USER, ride("c", "Uber", "2023-12-01 10:00:00", dec!(99))),
    ]);

    let summary = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::default(), at("2025-01-10 08:00:00"))
        .await
        .unwrap();

    let months: Vec<&str> = summary
        .earnings_last_12_months
        .iter()
        .map(|m| m.month.as_str())
        .collect();
    assert_eq!(months, vec!["12/2024", "01/2025"]);
    assert_eq!(summary.year_total, dec!(10));
    assert_eq!(summary.month_total, dec!(10));
}

#[tokio::test]
async fn thirty_day_window_excludes_older_rides() {
    let now = at("2024-03-31 12:00:00");
    let repository = MockRideRepository::with_rides(vec![
        (USER, ride("old", "Uber", "2024-02-29 11:59:59", dec!(5))),
        (USER, ride("edge", "Uber", "2024-03-01 12:00:00", dec!(7))),
        (USER, ride("new", "Uber", "2024-03-30 08:00:00", dec!(9))),
    ]);

    let summary = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::default(), now)
        .await
        .unwrap();

    let cutoff = now - chrono::Duration::days(30);
    assert_eq!(summary.earnings_last_30_days.len(), 2);
    for point in &summary.earnings_last_30_days {
        let date = NaiveDateTime::parse_from_str(&point.date, "%Y-%m-%dT%H:%M:%S%.3fZ").unwrap();
        assert!(date >= cutoff);
    }
}

#[tokio::test]
async fn other_users_rides_are_ignored() {
    let repository = MockRideRepository::with_rides(vec![
        (USER, ride("mine", "Uber", "2024-03-01 10:00:00", dec!(10))),
        ("user-2", ride("theirs", "99", "2024-03-01 11:00:00", dec!(1000))),
    ]);

    let summary = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::for_month(3, 2024), at("2024-03-15 12:00:00"))
        .await
        .unwrap();

    assert_eq!(summary.month_total, dec!(10));
    assert_eq!(summary.earnings_by_platform.len(), 1);
    assert_eq!(summary.recent_rides.len(), 1);
}

#[tokio::test]
async fn reference_period_does_not_move_trailing_windows() {
    let repository = MockRideRepository::with_rides(vec![(
        USER,
        ride("r1", "Uber", "2023-01-10 10:00:00", dec!(40)),
    )]);

    let summary = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::for_month(1, 2023), at("2024-03-15 12:00:00"))
        .await
        .unwrap();

    assert_eq!(summary.month_total, dec!(40));
    assert_eq!(summary.month_projection, dec!(1240.00));
    assert!(summary.earnings_last_30_days.is_empty());
    assert!(summary.earnings_last_12_months.is_empty());
    assert_eq!(summary.recent_rides.len(), 1);
}

#[tokio::test]
async fn rejects_invalid_periods() {
    let reports = service(MockRideRepository::default());
    let now = at("2024-03-15 12:00:00");

    for query in [
        SummaryQuery::for_month(13, 2024),
        SummaryQuery::for_month(0, 2024),
        SummaryQuery {
            month: None,
            year: Some(1999),
        },
    ] {
        let err = reports
            .get_earnings_summary_at(USER, query, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Report(ReportError::InvalidPeriod { .. })
        ));
    }
}

#[tokio::test]
async fn distinct_timestamp_policy_counts_each_time() {
    let rides = vec![
        (USER, ride("a", "Uber", "2024-03-01 08:00:00", dec!(30))),
        (USER, ride("b", "Uber", "2024-03-01 18:00:00", dec!(30))),
        (USER, ride("c", "Uber", "2024-03-02 08:00:00", dec!(30))),
    ];
    let query = SummaryQuery::for_month(3, 2024);
    let now = at("2024-03-15 12:00:00");

    let calendar = ReportService::new(
        Arc::new(MockRideRepository::with_rides(rides.clone())),
        DaysWorkedPolicy::CalendarDays,
    )
    .get_earnings_summary_at(USER, query, now)
    .await
    .unwrap();
    let timestamps = ReportService::new(
        Arc::new(MockRideRepository::with_rides(rides)),
        DaysWorkedPolicy::DistinctTimestamps,
    )
    .get_earnings_summary_at(USER, query, now)
    .await
    .unwrap();

    assert_eq!(calendar.daily_average, dec!(45.00));
    assert_eq!(timestamps.daily_average, dec!(30.00));
    assert_eq!(timestamps.month_projection, dec!(930.00));
}

#[tokio::test]
async fn repository_failure_fails_the_summary() {
    let repository = MockRideRepository {
        fail_reads: true,
        ..Default::default()
    };

    let err = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::default(), at("2024-03-15 12:00:00"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(DatabaseError::QueryFailed(_))));
}

#[tokio::test]
async fn summary_never_loads_the_full_history() {
    let repository = Arc::new(MockRideRepository::with_rides(vec![
        (USER, ride("a", "Uber", "2020-06-01 10:00:00", dec!(10))),
        (USER, ride("b", "iFood", "2024-03-01 10:00:00", dec!(30))),
    ]));
    let reports = ReportService::new(repository.clone(), DaysWorkedPolicy::CalendarDays);

    let summary = reports
        .get_earnings_summary_at(USER, SummaryQuery::for_month(3, 2024), at("2024-03-15 12:00:00"))
        .await
        .unwrap();
    reports.get_monthly_stats(USER).await.unwrap();
    reports.get_platform_stats(USER).await.unwrap();

    assert_eq!(summary.earnings_by_platform.len(), 2);
    assert_eq!(summary.earnings_by_platform[0].platform, "iFood");
    assert_eq!(summary.earnings_by_platform[0].percentage, dec!(75.00));
    let ranges = repository.requested_ranges.lock().unwrap();
    assert_eq!(ranges.len(), 4);
    assert!(ranges.iter().all(|range| range.start.is_some()));
}

#[tokio::test]
async fn overflowing_history_fails_instead_of_panicking() {
    let repository = MockRideRepository::with_rides(vec![(
        USER,
        ride("huge", "Uber", "2024-03-01 10:00:00", dec!(3000000000000000000000000000)),
    )]);

    let err = service(repository)
        .get_earnings_summary_at(USER, SummaryQuery::for_month(3, 2024), at("2024-03-15 12:00:00"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unexpected(_)));
}

#[tokio::test]
async fn stats_cover_all_rides() {
    let repository = MockRideRepository::with_rides(vec![
        (USER, ride("a", "Uber", "2024-02-01 10:00:00", dec!(10))),
        (USER, ride("b", "iFood", "2024-03-01 10:00:00", dec!(30))),
    ]);
    let reports = service(repository);

    let monthly = reports.get_monthly_stats(USER).await.unwrap();
    let platforms = reports.get_platform_stats(USER).await.unwrap();

    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].month, "2024-03");
    assert_eq!(platforms[0].platform, "iFood");
    assert_eq!(platforms[0].percentage, dec!(75.00));
}

#[tokio::test]
async fn daily_series_covers_reference_month() {
    let repository = MockRideRepository::with_rides(vec![(
        USER,
        ride("a", "Uber", "2024-04-30 22:00:00", dec!(18)),
    )]);

    let series = service(repository)
        .get_daily_series_at(USER, SummaryQuery::for_month(4, 2024), at("2024-05-02 12:00:00"))
        .await
        .unwrap();

    assert_eq!(series.len(), 30);
    let last = series.last().unwrap();
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    assert_eq!(last.total, dec!(18.00));
}
