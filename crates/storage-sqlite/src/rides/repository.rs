use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::DefaultLoadingMode;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use rideledger_core::reports::{total_by_month, total_by_platform};
use rideledger_core::rides::{
    MonthTotals, NewRide, PlatformTotals, Ride, RideDateRange, RideFilter, RideRecord,
    RideRepositoryTrait,
};
use rideledger_core::{Error, Result};

use super::model::{RideDB, RideRecordDB};
use crate::db::{get_connection, run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{platforms, rides};

type RecordColumns = (
    rides::id,
    rides::platform_id,
    platforms::name,
    rides::ride_type,
    rides::ride_date,
    rides::gross_value,
    rides::fee_value,
    rides::net_value,
);

const RECORD_COLUMNS: RecordColumns = (
    rides::id,
    rides::platform_id,
    platforms::name,
    rides::ride_type,
    rides::ride_date,
    rides::gross_value,
    rides::fee_value,
    rides::net_value,
);

pub struct RideRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RideRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn into_records(rows: Vec<RideRecordDB>) -> Result<Vec<RideRecord>> {
    rows.into_iter()
        .map(|row| RideRecord::try_from(row).map_err(Error::from))
        .collect()
}

fn into_record(row: QueryResult<RideRecordDB>) -> Result<RideRecord> {
    let row = row.into_core()?;
    RideRecord::try_from(row).map_err(Error::from)
}

/// Streams every ride of `owner` through `fold` without materializing them.
fn fold_all_records<T>(
    conn: &mut SqliteConnection,
    owner: &str,
    fold: impl FnOnce(&mut dyn Iterator<Item = Result<RideRecord>>) -> Result<T>,
) -> Result<T> {
    let mut rows = rides::table
        .inner_join(platforms::table)
        .filter(rides::user_id.eq(owner))
        .select(RECORD_COLUMNS)
        .load_iter::<RideRecordDB, DefaultLoadingMode>(conn)
        .into_core()?
        .map(into_record);
    fold(&mut rows)
}

fn load_records_in(
    conn: &mut SqliteConnection,
    owner: &str,
    range: RideDateRange,
) -> Result<Vec<RideRecord>> {
    let mut query = rides::table
        .inner_join(platforms::table)
        .filter(rides::user_id.eq(owner))
        .select(RECORD_COLUMNS)
        .into_boxed();
    if let Some(start) = range.start {
        query = query.filter(rides::ride_date.ge(start));
    }
    if let Some(end) = range.end {
        query = query.filter(rides::ride_date.lt(end));
    }
    let rows = query
        .order((rides::ride_date.asc(), rides::id.asc()))
        .load::<RideRecordDB>(conn)
        .into_core()?;
    into_records(rows)
}

#[async_trait]
impl RideRepositoryTrait for RideRepository {
    async fn create(&self, user_id: &str, new_ride: NewRide) -> Result<Ride> {
        let owner = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Ride> {
                let ride_db = RideDB::from_new(
                    Uuid::new_v4().to_string(),
                    owner,
                    new_ride,
                    Utc::now().naive_utc(),
                );
                let inserted = diesel::insert_into(rides::table)
                    .values(&ride_db)
                    .returning(RideDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ride::try_from(inserted).map_err(Error::from)
            })
            .await
    }

    async fn delete(&self, user_id: &str, ride_id: &str) -> Result<usize> {
        let owner = user_id.to_string();
        let ride_id = ride_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    rides::table
                        .filter(rides::id.eq(ride_id))
                        .filter(rides::user_id.eq(owner)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    fn list(&self, user_id: &str, filter: &RideFilter) -> Result<Vec<Ride>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = rides::table
            .filter(rides::user_id.eq(user_id))
            .select(RideDB::as_select())
            .into_boxed();
        if let Some(from) = filter.from {
            query = query.filter(rides::ride_date.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(rides::ride_date.le(to));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        let rows = query
            .order((rides::ride_date.desc(), rides::id.asc()))
            .load::<RideDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| Ride::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn load_records(&self, user_id: &str, range: RideDateRange) -> Result<Vec<RideRecord>> {
        let owner = user_id.to_string();
        run_blocking(&self.pool, move |conn| load_records_in(conn, &owner, range)).await
    }

    async fn load_recent_records(&self, user_id: &str, limit: usize) -> Result<Vec<RideRecord>> {
        let owner = user_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        run_blocking(&self.pool, move |conn| {
            let rows = rides::table
                .inner_join(platforms::table)
                .filter(rides::user_id.eq(owner.as_str()))
                .select(RECORD_COLUMNS)
                .order((rides::ride_date.desc(), rides::id.asc()))
                .limit(limit)
                .load::<RideRecordDB>(conn)
                .into_core()?;
            into_records(rows)
        })
        .await
    }

    async fn load_platform_totals(&self, user_id: &str) -> Result<Vec<PlatformTotals>> {
        let owner = user_id.to_string();
        run_blocking(&self.pool, move |conn| {
            fold_all_records(conn, &owner, |rows| total_by_platform(rows))
        })
        .await
    }

    async fn load_month_totals(&self, user_id: &str) -> Result<Vec<MonthTotals>> {
        let owner = user_id.to_string();
        run_blocking(&self.pool, move |conn| {
            fold_all_records(conn, &owner, |rows| total_by_month(rows))
        })
        .await
    }
}
