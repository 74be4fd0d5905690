//! Ride domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_RIDE_AMOUNT;
use crate::errors::{Error, Result};

/// Kind of work a record represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RideType {
    #[default]
    Ride,
    Delivery,
}

impl RideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideType::Ride => "ride",
            RideType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ride" => Ok(RideType::Ride),
            "delivery" => Ok(RideType::Delivery),
            other => Err(Error::invalid_input(format!("Unknown ride type '{}'", other))),
        }
    }
}

/// Domain model representing a stored ride or delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub user_id: String,
    pub platform_id: String,
    #[serde(rename = "type")]
    pub ride_type: RideType,
    pub ride_date: NaiveDateTime,
    pub gross_value: Decimal,
    pub fee_value: Decimal,
    pub net_value: Decimal,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for logging a new ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    #[serde(rename = "type", default)]
    pub ride_type: RideType,
    pub platform_id: String,
    pub ride_date: NaiveDateTime,
    pub gross_value: Decimal,
    #[serde(default)]
    pub fee_value: Decimal,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

impl NewRide {
    pub fn validate(&self) -> Result<()> {
        if self.platform_id.trim().is_empty() {
            return Err(Error::invalid_input("Platform is required"));
        }
        if self.gross_value.is_sign_negative() {
            return Err(Error::invalid_input("Gross value cannot be negative"));
        }
        if self.fee_value.is_sign_negative() {
            return Err(Error::invalid_input("Fee value cannot be negative"));
        }
        if self.gross_value > MAX_RIDE_AMOUNT || self.fee_value > MAX_RIDE_AMOUNT {
            return Err(Error::invalid_input(format!(
                "Ride amounts cannot exceed {}",
                MAX_RIDE_AMOUNT
            )));
        }
        if self.fee_value > self.gross_value {
            return Err(Error::invalid_input(
                "Fee value cannot exceed the gross value",
            ));
        }
        if matches!(self.duration_minutes, Some(minutes) if minutes < 0) {
            return Err(Error::invalid_input("Duration cannot be negative"));
        }
        Ok(())
    }

    /// Amount actually earned once the platform fee is deducted.
    pub fn net_value(&self) -> Decimal {
        self.gross_value - self.fee_value
    }
}

/// Query filter for listing a user's rides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideFilter {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}

/// Half-open `[start, end)` range over `ride_date`. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RideDateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl RideDateRange {
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.start.map_or(true, |start| *date >= start) && self.end.map_or(true, |end| *date < end)
    }
}

/// Read model joining a ride to its platform name, used by the reports.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRecord {
    pub id: String,
    pub platform_id: String,
    pub platform_name: String,
    pub ride_type: RideType,
    pub ride_date: NaiveDateTime,
    pub gross_value: Decimal,
    pub fee_value: Decimal,
    pub net_value: Decimal,
}

/// Per-platform totals over all of a user's rides.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTotals {
    pub platform_name: String,
    pub gross_value: Decimal,
    pub net_value: Decimal,
    pub ride_count: usize,
}

/// Totals of one calendar month of a user's rides.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    pub gross_value: Decimal,
    pub fee_value: Decimal,
    pub net_value: Decimal,
    pub ride_count: usize,
    /// Distinct calendar days with at least one ride.
    pub days_worked: usize,
}
