//! Database models for rides.
//!
//! Amounts are stored as decimal strings and parsed on the way out; a value
//! that does not parse is reported rather than silently zeroed.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use rideledger_core::rides::{NewRide, Ride, RideRecord, RideType};

use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::rides)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RideDB {
    pub id: String,
    pub user_id: String,
    pub platform_id: String,
    pub ride_type: String,
    pub ride_date: NaiveDateTime,
    pub gross_value: String,
    pub fee_value: String,
    pub net_value: String,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RideDB {
    pub fn from_new(
        id: String,
        user_id: String,
        new_ride: NewRide,
        now: NaiveDateTime,
    ) -> Self {
        let net_value = new_ride.net_value();
        Self {
            id,
            user_id,
            platform_id: new_ride.platform_id,
            ride_type: new_ride.ride_type.as_str().to_string(),
            ride_date: new_ride.ride_date,
            gross_value: new_ride.gross_value.to_string(),
            fee_value: new_ride.fee_value.to_string(),
            net_value: net_value.to_string(),
            duration_minutes: new_ride.duration_minutes,
            notes: new_ride.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row of the rides/platforms join used by the reports.
#[derive(Queryable, Debug, Clone)]
pub struct RideRecordDB {
    pub id: String,
    pub platform_id: String,
    pub platform_name: String,
    pub ride_type: String,
    pub ride_date: NaiveDateTime,
    pub gross_value: String,
    pub fee_value: String,
    pub net_value: String,
}

fn parse_amount(column: &str, ride_id: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::MalformedValue(format!(
            "rides.{} of ride {} ('{}'): {}",
            column, ride_id, value, e
        ))
    })
}

fn parse_ride_type(ride_id: &str, value: &str) -> Result<RideType, StorageError> {
    RideType::from_str(value).map_err(|_| {
        StorageError::MalformedValue(format!("rides.ride_type of ride {} ('{}')", ride_id, value))
    })
}

impl TryFrom<RideDB> for Ride {
    type Error = StorageError;

    fn try_from(db: RideDB) -> Result<Self, Self::Error> {
        Ok(Self {
            ride_type: parse_ride_type(&db.id, &db.ride_type)?,
            gross_value: parse_amount("gross_value", &db.id, &db.gross_value)?,
            fee_value: parse_amount("fee_value", &db.id, &db.fee_value)?,
            net_value: parse_amount("net_value", &db.id, &db.net_value)?,
            id: db.id,
            user_id: db.user_id,
            platform_id: db.platform_id,
            ride_date: db.ride_date,
            duration_minutes: db.duration_minutes,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<RideRecordDB> for RideRecord {
    type Error = StorageError;

    fn try_from(db: RideRecordDB) -> Result<Self, Self::Error> {
        Ok(Self {
            ride_type: parse_ride_type(&db.id, &db.ride_type)?,
            gross_value: parse_amount("gross_value", &db.id, &db.gross_value)?,
            fee_value: parse_amount("fee_value", &db.id, &db.fee_value)?,
            net_value: parse_amount("net_value", &db.id, &db.net_value)?,
            id: db.id,
            platform_id: db.platform_id,
            platform_name: db.platform_name,
            ride_date: db.ride_date,
        })
    }
}
