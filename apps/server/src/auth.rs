use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use rideledger_core::users::{AuthenticationError, PasswordHasherTrait};
use rideledger_core::{Error as CoreError, Result as CoreResult};

use crate::main_lib::AppState;

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// Identity of the caller, inserted into request extensions by [`require_jwt`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthManager {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            validation,
            token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| AuthenticatedUser {
                user_id: data.claims.sub,
            })
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::Unauthorized
                }
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// Argon2id with the crate's default parameters and a random salt per hash.
///
/// Both operations run on the blocking thread pool.
pub struct Argon2PasswordHasher;

fn hash_blocking(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthenticationError::Hashing(e.to_string()).into())
}

fn verify_blocking(password: &str, password_hash: &str) -> CoreResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthenticationError::Hashing(format!("Stored hash is invalid: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(other) => Err(AuthenticationError::Hashing(other.to_string()).into()),
    }
}

fn join_error(err: tokio::task::JoinError) -> CoreError {
    AuthenticationError::Hashing(format!("Hashing task failed: {err}")).into()
}

#[async_trait]
impl PasswordHasherTrait for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> CoreResult<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(join_error)?
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> CoreResult<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &password_hash))
            .await
            .map_err(join_error)?
    }
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let user = state.auth.validate_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn unix_now() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    #[test]
    fn issued_token_carries_user_id() {
        let auth = AuthManager::new(SECRET, Duration::from_secs(1800));
        let token = auth.issue_token("user-42").unwrap();

        let user = auth.validate_token(&token).unwrap();
        assert_eq!(user.user_id, "user-42");
        assert_eq!(auth.expires_in(), Duration::from_secs(1800));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let issuer = AuthManager::new(b"ffffffffffffffffffffffffffffffff", Duration::from_secs(60));
        let token = issuer.issue_token("user-42").unwrap();

        let auth = AuthManager::new(SECRET, Duration::from_secs(60));
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            auth.validate_token("not-a-jwt"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = unix_now();
        let claims = Claims {
            sub: "user-42".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let auth = AuthManager::new(SECRET, Duration::from_secs(60));
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn secret_key_accepts_base64_or_raw_ascii() {
        let encoded = BASE64.encode(SECRET);
        assert_eq!(decode_secret_key(&encoded).unwrap(), SECRET.to_vec());
        assert_eq!(
            decode_secret_key("0123456789abcdef0123456789abcde!").unwrap().len(),
            32
        );
        assert!(decode_secret_key("   ").is_err());
        assert!(decode_secret_key(&BASE64.encode(b"short")).is_err());
    }

    #[tokio::test]
    async fn argon2_hasher_verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash_password("secret1").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify_password("secret1", &hash).await.unwrap());
        assert!(!hasher.verify_password("secret2", &hash).await.unwrap());
        assert!(hasher.verify_password("secret1", "plain-text").await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn argon2_hashing_leaves_the_runtime_thread_free() {
        let hasher = Arc::new(Argon2PasswordHasher);
        let hashing = tokio::spawn({
            let hasher = Arc::clone(&hasher);
            async move { hasher.hash_password("secret1").await }
        });

        // The only runtime thread must stay free while the hash is computed.
        let ticked = tokio::spawn(async { tokio::task::yield_now().await }).await;

        assert!(ticked.is_ok());
        assert!(!hashing.is_finished());
        let hash = hashing.await.unwrap().unwrap();
        assert!(hasher.verify_password("secret1", &hash).await.unwrap());
    }
}
