use std::sync::Arc;

use crate::{
    auth::{Argon2PasswordHasher, AuthManager},
    config::Config,
};
use rideledger_core::{
    platforms::{PlatformService, PlatformServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    rides::{RideService, RideServiceTrait},
    users::{UserService, UserServiceTrait},
};
use rideledger_storage_sqlite::{db, PlatformRepository, RideRepository, UserRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub platform_service: Arc<dyn PlatformServiceTrait + Send + Sync>,
    pub ride_service: Arc<dyn RideServiceTrait + Send + Sync>,
    pub report_service: Arc<dyn ReportServiceTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("RL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let platform_repository = Arc::new(PlatformRepository::new(pool.clone()));
    let ride_repository = Arc::new(RideRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::new(Argon2PasswordHasher),
    ));
    let platform_service = Arc::new(PlatformService::new(platform_repository.clone()));
    let ride_service = Arc::new(RideService::new(
        ride_repository.clone(),
        platform_repository,
    ));
    let report_service = Arc::new(ReportService::new(ride_repository, config.days_worked));
    tracing::info!("Days worked policy: {:?}", config.days_worked);

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl));

    Ok(Arc::new(AppState {
        user_service,
        platform_service,
        ride_service,
        report_service,
        auth,
    }))
}
