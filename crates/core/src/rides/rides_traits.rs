use async_trait::async_trait;

use crate::errors::Result;
use crate::rides::rides_model::{
    MonthTotals, NewRide, PlatformTotals, Ride, RideDateRange, RideFilter, RideRecord,
};

/// Trait for ride repository operations.
///
/// Every method is scoped to a single user; implementations must never return
/// another user's rides.
#[async_trait]
pub trait RideRepositoryTrait: Send + Sync {
    async fn create(&self, user_id: &str, new_ride: NewRide) -> Result<Ride>;
    async fn delete(&self, user_id: &str, ride_id: &str) -> Result<usize>;
    fn list(&self, user_id: &str, filter: &RideFilter) -> Result<Vec<Ride>>;

    /// Loads the user's rides with `ride_date` inside `range`, joined to their platform.
    async fn load_records(&self, user_id: &str, range: RideDateRange) -> Result<Vec<RideRecord>>;

    /// Loads the user's `limit` most recent rides, newest first.
    async fn load_recent_records(&self, user_id: &str, limit: usize) -> Result<Vec<RideRecord>>;

    /// Totals over all of the user's rides, one entry per platform name.
    async fn load_platform_totals(&self, user_id: &str) -> Result<Vec<PlatformTotals>>;

    /// Totals over all of the user's rides, one entry per calendar month.
    async fn load_month_totals(&self, user_id: &str) -> Result<Vec<MonthTotals>>;
}

/// Trait for ride service operations
#[async_trait]
pub trait RideServiceTrait: Send + Sync {
    async fn create_ride(&self, user_id: &str, new_ride: NewRide) -> Result<Ride>;
    fn list_rides(&self, user_id: &str, filter: RideFilter) -> Result<Vec<Ride>>;
    async fn delete_ride(&self, user_id: &str, ride_id: &str) -> Result<()>;
}
