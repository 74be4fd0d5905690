//! SQLite storage implementation for rides.

mod model;
mod repository;

pub use model::{RideDB, RideRecordDB};
pub use repository::RideRepository;
