// src/models/note.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'notes' table in the database.
/// Every note belongs to exactly one user; handlers always scope queries
/// by `user_id` so one user can never see another's notes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,

    pub user_id: i64,

    pub title: String,

    /// Raw markdown body, rendered client-side.
    pub markdown: String,

    pub created_at: chrono::DateTime<chrono::Utc>,

    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a note, and for full replacement via PUT.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteBodyRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters."))]
    pub title: String,

    pub markdown: String,
}

/// DTO for partial updates via PATCH. Absent fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct NotePatchRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters."))]
    pub title: Option<String>,

    pub markdown: Option<String>,
}
