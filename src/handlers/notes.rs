// src/handlers/notes.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::note::{Note, NoteBodyRequest, NotePatchRequest},
    utils::jwt::Claims,
};

/// Extracts the owning user's ID from the claims injected by the
/// auth middleware.
fn user_id_from_claims(claims: &Claims) -> Result<i64, AppError> {
    claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
}

/// Parses the `{id}` path segment.
///
/// A non-integer segment means the URL names no note at all, so it maps
/// to 404 rather than 400.
fn parse_note_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound("Note not found".to_string()))
}

/// Lists the authenticated user's notes, most recently updated first.
pub async fn list_notes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id_from_claims(&claims)?;

    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, user_id, title, markdown, created_at, updated_at
        FROM notes
        WHERE user_id = ?1
        ORDER BY updated_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(notes))
}

/// Creates a new note owned by the authenticated user.
pub async fn create_note(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NoteBodyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = user_id_from_claims(&claims)?;
    let now = chrono::Utc::now();

    let note = sqlx::query_as::<_, Note>(
        r#"
        INSERT INTO notes (user_id, title, markdown, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        RETURNING id, user_id, title, markdown, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.markdown)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create note: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Retrieves a single note by ID.
/// Notes owned by other users are indistinguishable from missing ones.
pub async fn get_note(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id_from_claims(&claims)?;
    let note_id = parse_note_id(&raw_id)?;

    let note = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, user_id, title, markdown, created_at, updated_at
        FROM notes
        WHERE id = ?1 AND user_id = ?2
        "#,
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Fully replaces a note's title and markdown (PUT).
pub async fn replace_note(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
    Json(payload): Json<NoteBodyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = user_id_from_claims(&claims)?;
    let note_id = parse_note_id(&raw_id)?;

    let note = sqlx::query_as::<_, Note>(
        r#"
        UPDATE notes
        SET title = ?1, markdown = ?2, updated_at = ?3
        WHERE id = ?4 AND user_id = ?5
        RETURNING id, user_id, title, markdown, created_at, updated_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.markdown)
    .bind(chrono::Utc::now())
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Partially updates a note (PATCH). Fields absent from the payload
/// keep their current value.
pub async fn patch_note(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
    Json(payload): Json<NotePatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = user_id_from_claims(&claims)?;
    let note_id = parse_note_id(&raw_id)?;

    let note = sqlx::query_as::<_, Note>(
        r#"
        UPDATE notes
        SET title = COALESCE(?1, title),
            markdown = COALESCE(?2, markdown),
            updated_at = ?3
        WHERE id = ?4 AND user_id = ?5
        RETURNING id, user_id, title, markdown, created_at, updated_at
        "#,
    )
    .bind(payload.title.as_deref())
    .bind(payload.markdown.as_deref())
    .bind(chrono::Utc::now())
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Deletes a note. Returns 204 No Content on success.
pub async fn delete_note(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id_from_claims(&claims)?;
    let note_id = parse_note_id(&raw_id)?;

    let result = sqlx::query(
        r#"
        DELETE FROM notes
        WHERE id = ?1 AND user_id = ?2
        "#,
    )
    .bind(note_id)
    .bind(user_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
