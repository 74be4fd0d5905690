use async_trait::async_trait;

use super::reports_model::{EarningsSummary, SummaryQuery};
use super::ride_stats::{DailyPoint, MonthlyStats, PlatformStats};
use crate::errors::Result;

/// Trait defining the contract for earnings report operations.
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    /// Builds the dashboard summary for `user_id`.
    ///
    /// `query.month` / `query.year` select the reference month and default to
    /// the current ones. The trailing 30-day and 12-month series are always
    /// relative to the current time.
    ///
    /// # Errors
    /// `ReportError::InvalidPeriod` for a month outside 1-12 or a year before 2000.
    async fn get_earnings_summary(
        &self,
        user_id: &str,
        query: SummaryQuery,
    ) -> Result<EarningsSummary>;

    /// Per-month totals and averages over all of the user's rides, newest month first.
    async fn get_monthly_stats(&self, user_id: &str) -> Result<Vec<MonthlyStats>>;

    /// Per-platform gross/net totals over all of the user's rides.
    async fn get_platform_stats(&self, user_id: &str) -> Result<Vec<PlatformStats>>;

    /// Zero-filled daily net totals for the reference month.
    async fn get_daily_series(&self, user_id: &str, query: SummaryQuery)
        -> Result<Vec<DailyPoint>>;
}
