//! SQLite storage implementation for RideLedger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `rideledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations (schema plus the seeded platforms)
//! - Repository implementations for users, platforms and rides
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```
//!
//! Writes are serialized through a single writer actor ([`WriteHandle`]);
//! reads use pooled connections on Tokio's blocking pool.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod platforms;
pub mod rides;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use platforms::PlatformRepository;
pub use rides::RideRepository;
pub use users::UserRepository;

// Re-export from rideledger-core for convenience
pub use rideledger_core::errors::{DatabaseError, Error, Result};
