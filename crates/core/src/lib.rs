//! RideLedger Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for RideLedger: rides, platforms,
//! users and the earnings reports built from them.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod platforms;
pub mod reports;
pub mod rides;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
