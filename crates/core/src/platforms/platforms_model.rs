//! Platform domain models.

use serde::{Deserialize, Serialize};

/// Domain model representing a ride/delivery platform (Uber, iFood, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    /// Presentation hint only, never used in calculations.
    pub color: Option<String>,
}
