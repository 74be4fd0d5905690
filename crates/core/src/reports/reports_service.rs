use async_trait::async_trait;
use chrono::{Duration, Local, Months, NaiveDateTime};
use log::{debug, error};
use std::sync::Arc;

use super::reports_calculator::{
    count_days_worked, daily_average, earnings_by_month, earnings_by_platform,
    earnings_by_ride_date, month_projection, recent_rides, sum_net_value,
};
use super::reports_model::{DaysWorkedPolicy, EarningsSummary, ReportPeriod, SummaryQuery};
use super::reports_traits::ReportServiceTrait;
use super::ride_stats::{
    calculate_monthly_stats, calculate_platform_stats, daily_series_for_month, DailyPoint,
    MonthlyStats, PlatformStats,
};
use crate::constants::{RECENT_RIDES_LIMIT, TRAILING_DAYS, TRAILING_MONTHS};
use crate::errors::Result;
use crate::rides::{RideDateRange, RideRepositoryTrait};

pub struct ReportService {
    ride_repository: Arc<dyn RideRepositoryTrait>,
    days_worked_policy: DaysWorkedPolicy,
}

impl ReportService {
    pub fn new(
        ride_repository: Arc<dyn RideRepositoryTrait>,
        days_worked_policy: DaysWorkedPolicy,
    ) -> Self {
        Self {
            ride_repository,
            days_worked_policy,
        }
    }

    /// Builds the summary against an explicit `now`.
    ///
    /// The six repository reads run concurrently. They are not a single
    /// snapshot: a ride written mid-request may show up in some sections only.
    pub async fn get_earnings_summary_at(
        &self,
        user_id: &str,
        query: SummaryQuery,
        now: NaiveDateTime,
    ) -> Result<EarningsSummary> {
        let period = ReportPeriod::resolve(query, now)?;
        debug!(
            "Building earnings summary for user {} ({:02}/{})",
            user_id,
            period.month(),
            period.year()
        );

        let last_30_days_start = now - Duration::days(TRAILING_DAYS);
        let last_12_months_start = now
            .checked_sub_months(Months::new(TRAILING_MONTHS))
            .unwrap_or(NaiveDateTime::MIN);

        let repo = &self.ride_repository;
        let (month_rides, year_rides, last_30_days, last_12_months, platform_totals, recent) =
            futures::try_join!(
                repo.load_records(user_id, period.month_range()),
                repo.load_records(user_id, period.year_range()),
                repo.load_records(user_id, RideDateRange::since(last_30_days_start)),
                repo.load_records(user_id, RideDateRange::since(last_12_months_start)),
                repo.load_platform_totals(user_id),
                repo.load_recent_records(user_id, RECENT_RIDES_LIMIT),
            )
            .map_err(|e| {
                error!("Failed to load rides for user {}: {}", user_id, e);
                e
            })?;

        let month_total = sum_net_value(&month_rides)?;
        let days_worked = count_days_worked(&month_rides, self.days_worked_policy);
        let average = daily_average(month_total, days_worked)?;

        Ok(EarningsSummary {
            month_total,
            year_total: sum_net_value(&year_rides)?,
            daily_average: average,
            month_projection: month_projection(average, period.days_in_month())?,
            earnings_last_30_days: earnings_by_ride_date(&last_30_days)?,
            earnings_last_12_months: earnings_by_month(&last_12_months)?,
            earnings_by_platform: earnings_by_platform(&platform_totals)?,
            recent_rides: recent_rides(&recent, RECENT_RIDES_LIMIT),
        })
    }

    pub async fn get_daily_series_at(
        &self,
        user_id: &str,
        query: SummaryQuery,
        now: NaiveDateTime,
    ) -> Result<Vec<DailyPoint>> {
        let period = ReportPeriod::resolve(query, now)?;
        let records = self
            .ride_repository
            .load_records(user_id, period.month_range())
            .await?;
        daily_series_for_month(&records, &period)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[async_trait]
impl ReportServiceTrait for ReportService {
    async fn get_earnings_summary(
        &self,
        user_id: &str,
        query: SummaryQuery,
    ) -> Result<EarningsSummary> {
        self.get_earnings_summary_at(user_id, query, local_now())
            .await
    }

    async fn get_monthly_stats(&self, user_id: &str) -> Result<Vec<MonthlyStats>> {
        let months = self.ride_repository.load_month_totals(user_id).await?;
        calculate_monthly_stats(&months)
    }

    async fn get_platform_stats(&self, user_id: &str) -> Result<Vec<PlatformStats>> {
        let platforms = self.ride_repository.load_platform_totals(user_id).await?;
        calculate_platform_stats(&platforms)
    }

    async fn get_daily_series(
        &self,
        user_id: &str,
        query: SummaryQuery,
    ) -> Result<Vec<DailyPoint>> {
        self.get_daily_series_at(user_id, query, local_now()).await
    }
}
