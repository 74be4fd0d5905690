use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::rides_model::{NewRide, Ride, RideFilter};
use super::rides_traits::{RideRepositoryTrait, RideServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::platforms::PlatformRepositoryTrait;

pub struct RideService {
    repository: Arc<dyn RideRepositoryTrait>,
    platform_repository: Arc<dyn PlatformRepositoryTrait>,
}

impl RideService {
    pub fn new(
        repository: Arc<dyn RideRepositoryTrait>,
        platform_repository: Arc<dyn PlatformRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            platform_repository,
        }
    }
}

#[async_trait]
impl RideServiceTrait for RideService {
    async fn create_ride(&self, user_id: &str, new_ride: NewRide) -> Result<Ride> {
        new_ride.validate()?;
        if self
            .platform_repository
            .get_by_id(&new_ride.platform_id)?
            .is_none()
        {
            return Err(Error::NotFound(format!("Platform {}", new_ride.platform_id)));
        }
        debug!(
            "Creating {} on platform {} for user {}",
            new_ride.ride_type, new_ride.platform_id, user_id
        );
        self.repository
            .create(user_id, new_ride)
            .await
            .map_err(|err| match err {
                Error::Database(DatabaseError::UniqueViolation(_)) => Error::ConstraintViolation(
                    "A ride on this platform at this date and time already exists".to_string(),
                ),
                other => other,
            })
    }

    fn list_rides(&self, user_id: &str, filter: RideFilter) -> Result<Vec<Ride>> {
        if matches!(filter.limit, Some(limit) if limit <= 0) {
            return Err(Error::invalid_input("Limit must be positive"));
        }
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(Error::invalid_input("'from' must not be after 'to'"));
            }
        }
        self.repository.list(user_id, &filter)
    }

    async fn delete_ride(&self, user_id: &str, ride_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, ride_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Ride {}", ride_id)));
        }
        Ok(())
    }
}
