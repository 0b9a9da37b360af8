//! Member registration, login and bearer token handling.
//!
//! Passwords are stored as Argon2id PHC strings. Tokens are HS256 JWTs whose `sub` is the
//! user id; validating one needs only the signing secret.

use std::sync::{Arc, OnceLock};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gym_core::repository::UserRepository;
use gym_core::{AuthUser, CoreError, CoreResult, NewUser, User};

use crate::state::AuthConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    auth: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, auth: AuthConfig) -> Self {
        Self { users, auth }
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> CoreResult<User> {
        let password_hash = hash_password(password.to_string()).await?;
        let new_user = NewUser {
            email: normalize_email(email),
            password_hash,
            name: name.to_string(),
        };

        let user = self.users.create_user(&new_user).await?;
        info!(user_id = user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail with the same `InvalidCredentials`, after the
    /// same amount of Argon2 work.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<(String, User)> {
        let email = normalize_email(email);
        let credentials = self.users.find_credentials_by_email(&email).await?;
        let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());

        let verified = verify_password(password.to_string(), stored_hash).await?;
        let user = match credentials {
            Some(credentials) if verified => credentials.user,
            _ => {
                warn!("Login failed");
                return Err(CoreError::InvalidCredentials);
            }
        };

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    pub fn issue_token(&self, user: &User) -> CoreResult<String> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            exp: (Utc::now() + Duration::seconds(self.auth.expiration as i64)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.auth.secret.as_bytes()))
            .map_err(|e| CoreError::InternalError(format!("Token encoding failed: {}", e)))
    }

    /// Resolves a bearer token to the user it was issued for.
    pub fn authenticate(&self, token: &str) -> CoreResult<AuthUser> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.auth.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| CoreError::InvalidToken)?;

        let claims = token_data.claims;
        let id = claims.sub.parse::<i64>().map_err(|_| CoreError::InvalidToken)?;
        Ok(AuthUser {
            id,
            email: claims.email,
            name: claims.name,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verified against when the email is unknown, so both failure paths cost one Argon2 run.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> CoreResult<&'static str> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_blocking("gym-login-placeholder")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

fn hash_blocking(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::InternalError(format!("Password hashing failed: {}", e)))
}

fn verify_blocking(password: &str, hash: &str) -> CoreResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::InternalError(format!("Invalid stored hash: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::InternalError(format!("Password verification failed: {}", e))),
    }
}

async fn hash_password(password: String) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| CoreError::InternalError(format!("Hashing task failed: {}", e)))?
}

/// Checks `password` against the stored hash. Without one, a placeholder hash is checked
/// instead and the result is always `false`.
async fn verify_password(password: String, hash: Option<String>) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_blocking(&password, &hash),
        None => verify_blocking(&password, dummy_hash()?).map(|_| false),
    })
    .await
    .map_err(|e| CoreError::InternalError(format!("Verification task failed: {}", e)))?
}
