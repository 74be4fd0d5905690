use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

use super::users_errors::AuthenticationError;
use super::users_model::{normalize_email, validate_password, NewUser, NewUserRecord, User};
use super::users_traits::{PasswordHasherTrait, UserRepositoryTrait, UserServiceTrait};
use crate::errors::{DatabaseError, Error, Result};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn PasswordHasherTrait>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        hasher: Arc<dyn PasswordHasherTrait>,
    ) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let email = normalize_email(&new_user.email);

        if self.repository.find_by_email(&email)?.is_some() {
            return Err(AuthenticationError::EmailAlreadyRegistered.into());
        }

        let password_hash = self.hasher.hash_password(&new_user.password).await?;
        let record = NewUserRecord {
            name: new_user.name.trim().to_string(),
            email,
            password_hash,
        };

        // A concurrent registration can still win the race past the lookup above.
        let user = self
            .repository
            .create(record)
            .await
            .map_err(|err| match err {
                Error::Database(DatabaseError::UniqueViolation(_)) => {
                    AuthenticationError::EmailAlreadyRegistered.into()
                }
                other => other,
            })?;
        debug!("Registered user {}", user.id);
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        if validate_password(password).is_err() {
            return Err(AuthenticationError::InvalidCredentials.into());
        }
        let Some(user) = self.repository.find_by_email(&normalize_email(email))? else {
            return Err(AuthenticationError::InvalidCredentials.into());
        };
        if !self
            .hasher
            .verify_password(password, &user.password_hash)
            .await?
        {
            warn!("Rejected sign in for user {}", user.id);
            return Err(AuthenticationError::InvalidCredentials.into());
        }
        Ok(user)
    }
}
