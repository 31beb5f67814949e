// src/handlers/spa.rs

use axum::{Json, extract::State, response::Html};
use serde_json::json;

use crate::config::Config;

/// Minimal shell served when no front-end bundle has been built yet,
/// so the API is usable standalone during development.
const FALLBACK_SHELL: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Notes</title>
  </head>
  <body>
    <div id="root"></div>
    <p>Front-end bundle not found. Build it into the static directory.</p>
  </body>
</html>
"#;

/// Serves the single-page application shell for the root path.
///
/// Client-side routing takes over from here; the server only hands out
/// the shell and the static assets under /static.
pub async fn index(State(config): State<Config>) -> Html<String> {
    let shell_path = format!("{}/index.html", config.static_dir);

    match tokio::fs::read_to_string(&shell_path).await {
        Ok(contents) => Html(contents),
        Err(e) => {
            tracing::warn!("Could not read SPA shell at {}: {}", shell_path, e);
            Html(FALLBACK_SHELL.to_string())
        }
    }
}

/// Diagnostic endpoint. Not part of the product surface.
pub async fn test_view() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
