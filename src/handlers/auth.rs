// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{RefreshRequest, RegisterRequest, TokenRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH, sign_token, sign_token_pair, verify_token},
    },
};

/// Registers a new user account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, username, email, password, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        let is_duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if is_duplicate {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Validates credentials and issues an access/refresh token pair.
///
/// Verifies the username and password against the database.
/// If valid, signs both tokens with the user's ID as subject.
pub async fn obtain_token_pair(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, created_at
        FROM users
        WHERE username = ?1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Token obtain DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    // Same error for unknown user and wrong password, to avoid
    // confirming which usernames exist.
    let user = user.ok_or(AppError::AuthError(
        "Invalid username or password".to_string(),
    ))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError(
            "Invalid username or password".to_string(),
        ));
    }

    let pair = sign_token_pair(user.id, &config)?;

    Ok(Json(pair))
}

/// Exchanges a valid refresh token for a new access token.
///
/// An access token presented here is rejected: only tokens carrying
/// the 'refresh' type claim may be exchanged.
pub async fn refresh_token(
    State(config): State<Config>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = verify_token(&payload.refresh, &config.jwt_secret)?;

    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(AppError::AuthError(
            "Token is not a refresh token".to_string(),
        ));
    }

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

    let access = sign_token(
        user_id,
        TOKEN_TYPE_ACCESS,
        &config.jwt_secret,
        config.access_token_lifetime_secs,
    )?;

    Ok(Json(json!({ "access": access })))
}
