//! HTTP client for the RideLedger API.

use log::debug;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use rideledger_core::platforms::Platform;
use rideledger_core::reports::{DailyPoint, EarningsSummary, MonthlyStats, PlatformStats, SummaryQuery};
use rideledger_core::rides::{NewRide, Ride, RideFilter};
use rideledger_core::users::{NewUser, SignInRequest};

use crate::error::{ClientError, Result};
use crate::session::Session;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix shared by every route.
const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3333`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!("[ApiClient] {} {}", method, url);
        self.client.request(method, url)
    }

    /// Builds a request carrying the session's bearer token.
    ///
    /// Fails with `SessionExpired` without touching the network.
    fn authed(&self, session: &Session, method: Method, path: &str) -> Result<RequestBuilder> {
        let session = session.ensure_valid()?;
        Ok(self.request(method, path).bearer_auth(session.token()))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => err.message,
            Err(_) => body.chars().take(200).collect(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{} - {}", e, body)))
    }

    async fn send_empty(request: RequestBuilder) -> Result<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn sign_up(&self, new_user: &NewUser) -> Result<()> {
        Self::send_empty(self.request(Method::POST, "/registers").json(new_user)).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let body = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: TokenResponse =
            Self::send_json(self.request(Method::POST, "/sessions").json(&body)).await?;
        Session::from_token(response.token)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get_summary(
        &self,
        session: &Session,
        query: SummaryQuery,
    ) -> Result<EarningsSummary> {
        let request = self
            .authed(session, Method::GET, "/reports/summary")?
            .query(&query);
        Self::send_json(request).await
    }

    pub async fn get_monthly_stats(&self, session: &Session) -> Result<Vec<MonthlyStats>> {
        Self::send_json(self.authed(session, Method::GET, "/reports/monthly")?).await
    }

    pub async fn get_platform_stats(&self, session: &Session) -> Result<Vec<PlatformStats>> {
        Self::send_json(self.authed(session, Method::GET, "/reports/platforms")?).await
    }

    pub async fn get_daily_series(
        &self,
        session: &Session,
        query: SummaryQuery,
    ) -> Result<Vec<DailyPoint>> {
        let request = self
            .authed(session, Method::GET, "/reports/daily")?
            .query(&query);
        Self::send_json(request).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rides & platforms
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_platforms(&self, session: &Session) -> Result<Vec<Platform>> {
        Self::send_json(self.authed(session, Method::GET, "/platforms")?).await
    }

    pub async fn create_ride(&self, session: &Session, new_ride: &NewRide) -> Result<Ride> {
        Self::send_json(self.authed(session, Method::POST, "/rides")?.json(new_ride)).await
    }

    pub async fn list_rides(&self, session: &Session, filter: &RideFilter) -> Result<Vec<Ride>> {
        Self::send_json(self.authed(session, Method::GET, "/rides")?.query(filter)).await
    }

    pub async fn delete_ride(&self, session: &Session, ride_id: &str) -> Result<()> {
        let path = format!("/rides/{}", ride_id);
        Self::send_empty(self.authed(session, Method::DELETE, &path)?).await
    }
}

/// True when `err` is the server rejecting the credentials rather than a fault.
pub fn is_unauthorized(err: &ClientError) -> bool {
    err.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
}
