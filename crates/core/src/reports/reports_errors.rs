use thiserror::Error;

use crate::constants::MIN_REFERENCE_YEAR;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("Invalid period {month:02}/{year}: month must be 1-12 and year at least {min_year}", min_year = MIN_REFERENCE_YEAR)]
    InvalidPeriod { month: u32, year: i32 },
}
