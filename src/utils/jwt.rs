// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Distinguishes access tokens from refresh tokens ('access'/'refresh').
    pub token_type: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Access + refresh token pair returned by the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs a single JWT of the given type for the user.
pub fn sign_token(
    id: i64,
    token_type: &str,
    secret: &str,
    lifetime_secs: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + lifetime_secs as usize;

    let claims = Claims {
        sub: id.to_string(), // Store User ID in 'sub' claim
        token_type: token_type.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Signs a fresh access/refresh pair for the user.
pub fn sign_token_pair(id: i64, config: &Config) -> Result<TokenPair, AppError> {
    let access = sign_token(
        id,
        TOKEN_TYPE_ACCESS,
        &config.jwt_secret,
        config.access_token_lifetime_secs,
    )?;
    let refresh = sign_token(
        id,
        TOKEN_TYPE_REFRESH,
        &config.jwt_secret,
        config.refresh_token_lifetime_secs,
    )?;

    Ok(TokenPair { access, refresh })
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
/// Callers must still check `token_type` matches what they expect.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// Only access tokens are accepted here; a refresh token presented as a
/// bearer credential is rejected.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    match verify_token(token, &config.jwt_secret) {
        Ok(claims) if claims.token_type == TOKEN_TYPE_ACCESS => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
