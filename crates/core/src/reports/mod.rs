//! Earnings reports.
//!
//! Turns a user's ride records into the dashboard summary (period totals,
//! daily average, month-end projection, trailing series, per-platform
//! distribution, recent rides) and the per-month / per-platform statistics.

mod reports_calculator;
mod reports_errors;
mod reports_model;
mod reports_service;
mod reports_traits;
mod ride_stats;

#[cfg(test)]
mod reports_service_tests;

pub use reports_calculator::*;
pub use reports_errors::ReportError;
pub use reports_model::*;
pub use reports_service::ReportService;
pub use reports_traits::ReportServiceTrait;
pub use ride_stats::{
    calculate_monthly_stats, calculate_platform_stats, daily_series_for_month, total_by_month,
    total_by_platform, DailyPoint, MonthlyStats, PlatformStats,
};
