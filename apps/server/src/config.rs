use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use rideledger_core::reports::DaysWorkedPolicy;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub days_worked: DaysWorkedPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("RL_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3333".to_string())
            .parse()
            .context("Invalid RL_LISTEN_ADDR")?;
        let db_path = std::env::var("RL_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("RL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("RL_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let raw_secret = std::env::var("RL_JWT_SECRET").context("RL_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&raw_secret)?;
        let ttl_minutes: u64 = std::env::var("RL_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .context("Invalid RL_TOKEN_TTL_MINUTES")?;
        let days_worked = match std::env::var("RL_DAYS_WORKED") {
            Ok(raw) => raw.parse().context("Invalid RL_DAYS_WORKED")?,
            Err(_) => DaysWorkedPolicy::default(),
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_minutes * 60),
            days_worked,
        })
    }
}
