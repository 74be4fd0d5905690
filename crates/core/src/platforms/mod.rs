//! Platforms module - the apps through which rides are booked.

mod platforms_model;
mod platforms_service;
mod platforms_traits;

pub use platforms_model::Platform;
pub use platforms_service::PlatformService;
pub use platforms_traits::{PlatformRepositoryTrait, PlatformServiceTrait};
