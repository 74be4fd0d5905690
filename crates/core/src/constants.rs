use rust_decimal::Decimal;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Largest gross or fee value accepted for a single ride
pub const MAX_RIDE_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Oldest reference year accepted by the earnings summary
pub const MIN_REFERENCE_YEAR: i32 = 2000;

/// Length of the trailing daily earnings window
pub const TRAILING_DAYS: i64 = 30;

/// Length of the trailing monthly earnings window
pub const TRAILING_MONTHS: u32 = 12;

/// Number of rides listed in the summary's recent rides
pub const RECENT_RIDES_LIMIT: usize = 5;

/// Password length bounds accepted at registration and sign in
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 100;
