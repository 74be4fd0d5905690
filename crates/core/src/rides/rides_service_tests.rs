use super::*;
use crate::errors::{DatabaseError, Error, Result};
use crate::platforms::{Platform, PlatformRepositoryTrait};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockRideRepository {
    rides: Mutex<Vec<Ride>>,
}

#[async_trait]
impl RideRepositoryTrait for MockRideRepository {
    async fn create(&self, user_id: &str, new_ride: NewRide) -> Result<Ride> {
        let mut rides = self.rides.lock().unwrap();
        if rides.iter().any(|r| {
            r.user_id == user_id
                && r.ride_date == new_ride.ride_date
                && r.platform_id == new_ride.platform_id
        }) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                "UNIQUE constraint failed: rides.user_id, rides.ride_date, rides.platform_id"
                    .to_string(),
            )));
        }
        let ride = Ride {
            id: format!("ride-{}", rides.len() + 1),
            user_id: user_id.to_string(),
            platform_id: new_ride.platform_id.clone(),
            ride_type: new_ride.ride_type,
            ride_date: new_ride.ride_date,
            gross_value: new_ride.gross_value,
            fee_value: new_ride.fee_value,
            net_value: new_ride.net_value(),
            duration_minutes: new_ride.duration_minutes,
            notes: new_ride.notes,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        rides.push(ride.clone());
        Ok(ride)
    }

    async fn delete(&self, user_id: &str, ride_id: &str) -> Result<usize> {
        let mut rides = self.rides.lock().unwrap();
        let before = rides.len();
        rides.retain(|r| !(r.user_id == user_id && r.id == ride_id));
        Ok(before - rides.len())
    }

    fn list(&self, user_id: &str, _filter: &RideFilter) -> Result<Vec<Ride>> {
        Ok(self
            .rides
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn load_records(&self, _user_id: &str, _range: RideDateRange) -> Result<Vec<RideRecord>> {
        Ok(Vec::new())
    }

    async fn load_recent_records(&self, _user_id: &str, _limit: usize) -> Result<Vec<RideRecord>> {
        Ok(Vec::new())
    }

    async fn load_platform_totals(&self, _user_id: &str) -> Result<Vec<PlatformTotals>> {
        Ok(Vec::new())
    }

    async fn load_month_totals(&self, _user_id: &str) -> Result<Vec<MonthTotals>> {
        Ok(Vec::new())
    }
}

struct MockPlatformRepository;

impl PlatformRepositoryTrait for MockPlatformRepository {
    fn list(&self) -> Result<Vec<Platform>> {
        Ok(vec![Platform {
            id: "uber".to_string(),
            name: "Uber".to_string(),
            color: None,
        }])
    }

    fn get_by_id(&self, platform_id: &str) -> Result<Option<Platform>> {
        Ok(self.list()?.into_iter().find(|p| p.id == platform_id))
    }
}

fn setup() -> (Arc<MockRideRepository>, RideService) {
    let repository = Arc::new(MockRideRepository::default());
    let service = RideService::new(repository.clone(), Arc::new(MockPlatformRepository));
    (repository, service)
}

fn new_ride(platform_id: &str) -> NewRide {
    NewRide {
        ride_type: RideType::Delivery,
        platform_id: platform_id.to_string(),
        ride_date: NaiveDateTime::parse_from_str("2024-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        gross_value: dec!(25.50),
        fee_value: dec!(5.25),
        duration_minutes: Some(35),
        notes: None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn create_ride_stores_net_value() {
    let (_, service) = setup();

    let ride = service.create_ride("user-1", new_ride("uber")).await.unwrap();

    assert_eq!(ride.net_value, dec!(20.25));
    assert_eq!(ride.ride_type, RideType::Delivery);
}

#[tokio::test]
async fn create_ride_requires_known_platform() {
    let (repository, service) = setup();

    let err = service
        .create_ride("user-1", new_ride("lyft"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert!(repository.rides.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_ride_rejects_fee_above_gross() {
    let (_, service) = setup();
    let mut ride = new_ride("uber");
    ride.fee_value = dec!(30);

    let err = service.create_ride("user-1", ride).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn create_ride_rejects_amounts_above_the_ceiling() {
    let (repository, service) = setup();
    let mut ride = new_ride("uber");
    ride.gross_value = dec!(3000000000000000000000000000);
    ride.fee_value = dec!(0);

    let err = service.create_ride("user-1", ride).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(repository.rides.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_rides_validates_filter() {
    let (_, service) = setup();
    let from = NaiveDateTime::parse_from_str("2024-03-02 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    let to = NaiveDateTime::parse_from_str("2024-03-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

    assert!(service
        .list_rides(
            "user-1",
            RideFilter {
                limit: Some(0),
                ..Default::default()
            }
        )
        .is_err());
    assert!(service
        .list_rides(
            "user-1",
            RideFilter {
                from: Some(from),
                to: Some(to),
                limit: None,
            }
        )
        .is_err());
    assert!(service.list_rides("user-1", RideFilter::default()).is_ok());
}

#[tokio::test]
async fn delete_ride_only_touches_owner_rides() {
    let (repository, service) = setup();
    let ride = service.create_ride("user-1", new_ride("uber")).await.unwrap();

    let err = service.delete_ride("user-2", &ride.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(repository.rides.lock().unwrap().len(), 1);

    service.delete_ride("user-1", &ride.id).await.unwrap();
    assert!(repository.rides.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_ride_is_a_constraint_violation() {
    let (_, service) = setup();
    service.create_ride("user-1", new_ride("uber")).await.unwrap();

    let err = service
        .create_ride("user-1", new_ride("uber"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ConstraintViolation(_)));
    // Another user may log the same ride.
    assert!(service.create_ride("user-2", new_ride("uber")).await.is_ok());
}
