use async_trait::async_trait;

use crate::errors::Result;
use crate::users::users_model::{NewUser, NewUserRecord, User};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create(&self, new_user: NewUserRecord) -> Result<User>;
}

/// One-way password hashing. Implemented by the server with argon2.
///
/// Hashing is CPU-bound; implementations should keep it off the async executor.
#[async_trait]
pub trait PasswordHasherTrait: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String>;
    /// Returns `Ok(false)` on a mismatch; errors are reserved for malformed hashes.
    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<User>;
}
