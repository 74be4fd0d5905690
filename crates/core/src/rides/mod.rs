//! Rides module - ride/delivery records, their service and repository traits.

mod rides_model;
mod rides_service;
mod rides_traits;

#[cfg(test)]
mod rides_service_tests;

pub use rides_model::{
    MonthTotals, NewRide, PlatformTotals, Ride, RideDateRange, RideFilter, RideRecord, RideType,
};
pub use rides_service::RideService;
pub use rides_traits::{RideRepositoryTrait, RideServiceTrait};
