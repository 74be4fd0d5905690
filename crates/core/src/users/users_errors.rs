use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Unknown e-mail and wrong password are deliberately indistinguishable.
    #[error("Invalid e-mail or password")]
    InvalidCredentials,

    #[error("E-mail already registered")]
    EmailAlreadyRegistered,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
