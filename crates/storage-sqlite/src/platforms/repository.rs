use diesel::prelude::*;
use std::sync::Arc;

use rideledger_core::platforms::{Platform, PlatformRepositoryTrait};
use rideledger_core::Result;

use super::model::PlatformDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::platforms;

/// Platforms are seeded by the initial migration and read-only at runtime.
pub struct PlatformRepository {
    pool: Arc<DbPool>,
}

impl PlatformRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl PlatformRepositoryTrait for PlatformRepository {
    fn list(&self) -> Result<Vec<Platform>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = platforms::table
            .select(PlatformDB::as_select())
            .order(platforms::name.asc())
            .load::<PlatformDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Platform::from).collect())
    }

    fn get_by_id(&self, platform_id: &str) -> Result<Option<Platform>> {
        let mut conn = get_connection(&self.pool)?;
        let row = platforms::table
            .find(platform_id)
            .select(PlatformDB::as_select())
            .first::<PlatformDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Platform::from))
    }
}
