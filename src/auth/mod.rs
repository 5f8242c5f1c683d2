//! Credential verification and token issuance.
//!
//! Self-contained service: registers users, verifies passwords, issues and
//! validates bearer tokens. Consumed by the [`require_auth`] middleware in
//! front of the club/member routes; registry handlers never touch it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use crate::validation::{validate_email, validate_required_text};

const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// Claims stored in the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    pub username: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
}

/// Authenticated caller, injected into request extensions by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
        }
    }
}

/// A registered user. The password hash never leaves this module.
#[derive(Debug, Clone)]
struct User {
    id: i64,
    email: String,
    username: String,
    full_name: String,
    hashed_password: String,
}

impl User {
    fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct UserRegistry {
    // Keyed by username
    users: HashMap<String, User>,
    next_user_id: i64,
}

/// Hash a password with argon2 and a fresh salt
fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2 hash
fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ApiError::internal(format!("Stored hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    registry: Arc<RwLock<UserRegistry>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_minutes: i64,
}

impl AuthService {
    pub fn new(secret: &str, expiration_minutes: i64) -> Self {
        Self {
            registry: Arc::new(RwLock::new(UserRegistry {
                next_user_id: 1,
                ..Default::default()
            })),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_minutes,
        }
    }

    /// Build from environment: `JWT_SECRET` (dev fallback when unset) and
    /// `JWT_EXPIRATION_MINUTES` (default 60).
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development key");
            "reading-clubs-development-secret-key".to_string()
        });
        let expiration_minutes = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_EXPIRATION_MINUTES);

        Self::new(&secret, expiration_minutes)
    }

    /// Register a new user. Usernames and emails must be unique.
    pub async fn register(&self, req: RegisterRequest) -> Result<UserInfo, ApiError> {
        validate_required_text(&req.username, "username")?;
        validate_required_text(&req.password, "password")?;
        validate_required_text(&req.full_name, "fullName")?;
        validate_email(&req.email)?;

        let hashed_password = hash_password(&req.password)?;

        let mut registry = self.registry.write().await;
        if registry.users.contains_key(&req.username) {
            return Err(ApiError::validation(format!(
                "username already registered: {}",
                req.username
            )));
        }
        if registry.users.values().any(|u| u.email == req.email) {
            return Err(ApiError::validation(format!(
                "email already registered: {}",
                req.email
            )));
        }

        let id = registry.next_user_id;
        registry.next_user_id += 1;

        let user = User {
            id,
            email: req.email,
            username: req.username.clone(),
            full_name: req.full_name,
            hashed_password,
        };
        let info = user.info();
        registry.users.insert(req.username.clone(), user);

        tracing::info!(username = %req.username, user_id = id, "User registered");

        Ok(info)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown username and wrong password produce the same error, so the
    /// response does not reveal which usernames exist.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ApiError> {
        let registry = self.registry.read().await;

        let Some(user) = registry.users.get(&req.username) else {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(ApiError::unauthorized("Invalid username or password"));
        };

        if !verify_password(&req.password, &user.hashed_password)? {
            tracing::warn!(username = %req.username, "Login failed - invalid credentials");
            return Err(ApiError::unauthorized("Invalid username or password"));
        }

        let token = self.generate_token(user)?;

        tracing::info!(username = %user.username, user_id = user.id, "User logged in");

        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.expiration_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a bearer token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::unauthorized("Token has expired")
                }
                _ => ApiError::unauthorized("Invalid token"),
            })
    }

    /// Strip the `Bearer ` scheme from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Bearer-token middleware for the club and member routes.
///
/// Extracts `Authorization: Bearer <token>`, validates it, and injects the
/// [`CurrentUser`] into request extensions. Missing, malformed, expired or
/// invalid tokens all yield 401 with a `detail` body.
pub async fn require_auth(
    State(auth): State<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(value) => AuthService::extract_from_header(value)
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without credentials rejected");
            return Err(ApiError::unauthorized("Not authenticated"));
        }
    };

    let claims = auth.validate_token(token)?;
    req.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(req).await)
}
