//! Users module - accounts that own rides, and credential checks.

mod users_errors;
mod users_model;
mod users_service;
mod users_traits;


pub use users_errors::AuthenticationError;
pub use users_model::{NewUser, NewUserRecord, SignInRequest, User};
pub use users_service::UserService;
pub use users_traits::{PasswordHasherTrait, UserRepositoryTrait, UserServiceTrait};
