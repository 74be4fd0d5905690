//! RideLedger API client.
//!
//! Session state is explicit: [`ApiClient::sign_in`] returns a [`Session`]
//! that callers pass to every authenticated call. Expired sessions are
//! rejected locally with [`ClientError::SessionExpired`].

mod client;
mod error;
mod session;

pub use client::{is_unauthorized, ApiClient};
pub use error::{ClientError, Result};
pub use session::Session;
