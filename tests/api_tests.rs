// tests/api_tests.rs

use notes_backend::{config::Config, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
///
/// Each test gets its own in-memory SQLite database. The pool is pinned
/// to a single connection that is never recycled, otherwise the
/// in-memory schema would vanish with the connection.
async fn spawn_app() -> String {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        access_token_lifetime_secs: 600, // 10 minutes for tests
        refresh_token_lifetime_secs: 3600,
        rust_log: "error".to_string(),
        static_dir: "static".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    };

    let state = AppState { pool, config };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a user and returns the JSON body of a token obtain call.
async fn register_and_obtain_tokens(
    client: &reqwest::Client,
    address: &str,
    username: &str,
    password: &str,
) -> serde_json::Value {
    let response = client
        .post(&format!("{}/register/", address))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
            "password2": password
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    client
        .post(&format!("{}/token/", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Token obtain failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse token json")
}

#[tokio::test]
async fn unknown_path_returns_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn root_serves_spa_shell() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: 200 with an HTML body, whether a built bundle or the fallback
    assert_eq!(response.status().as_u16(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = response.text().await.unwrap();
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn test_view_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/test/", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    // Act
    let response = client
        .post(&format!("{}/register/", address))
        .json(&serde_json::json!({
            "username": unique_name,
            "email": "someone@example.com",
            "password": "password123",
            "password2": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: created, and the hash never leaves the server
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], unique_name);
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send a username that is too short
    let response = client
        .post(&format!("{}/register/", address))
        .json(&serde_json::json!({
            "username": "yo",
            "email": "yo@example.com",
            "password": "password123",
            "password2": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/register/", address))
        .json(&serde_json::json!({
            "username": "mismatched",
            "email": "mismatched@example.com",
            "password": "password123",
            "password2": "password456"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "username": "taken_name",
        "email": "taken@example.com",
        "password": "password123",
        "password2": "password123"
    });

    let first = client
        .post(&format!("{}/register/", address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(first.status().as_u16(), 201);

    // Act
    let second = client
        .post(&format!("{}/register/", address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn token_obtain_returns_pair() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let tokens = register_and_obtain_tokens(&client, &address, "pair_user", "password123").await;

    // Assert
    assert!(tokens["access"].as_str().is_some());
    assert!(tokens["refresh"].as_str().is_some());
}

#[tokio::test]
async fn token_obtain_rejects_bad_credentials() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    register_and_obtain_tokens(&client, &address, "cred_user", "password123").await;

    // Act: wrong password
    let wrong_password = client
        .post(&format!("{}/token/", address))
        .json(&serde_json::json!({
            "username": "cred_user",
            "password": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Act: unknown user
    let unknown_user = client
        .post(&format!("{}/token/", address))
        .json(&serde_json::json!({
            "username": "nobody_here",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);
}

#[tokio::test]
async fn token_refresh_issues_usable_access_token() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let tokens = register_and_obtain_tokens(&client, &address, "refresh_user", "password123").await;
    let refresh = tokens["refresh"].as_str().unwrap();

    // Act
    let response = client
        .post(&format!("{}/token/refresh/", address))
        .json(&serde_json::json!({ "refresh": refresh }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let new_access = body["access"].as_str().expect("No access token in body");

    // The freshly minted access token must be accepted by the notes API
    let notes = client
        .get(&format!("{}/notes/", address))
        .header("Authorization", format!("Bearer {}", new_access))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(notes.status().as_u16(), 200);
}

#[tokio::test]
async fn token_refresh_rejects_access_token() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let tokens = register_and_obtain_tokens(&client, &address, "type_user", "password123").await;
    let access = tokens["access"].as_str().unwrap();

    // Act: an access token is not a refresh token
    let response = client
        .post(&format!("{}/token/refresh/", address))
        .json(&serde_json::json!({ "refresh": access }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn token_refresh_rejects_garbage() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/token/refresh/", address))
        .json(&serde_json::json!({ "refresh": "not.a.jwt" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn notes_require_access_token() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: no Authorization header at all
    let list = client
        .get(&format!("{}/notes/", address))
        .send()
        .await
        .expect("Failed to execute request");
    let create = client
        .post(&format!("{}/notes/", address))
        .json(&serde_json::json!({ "title": "t", "markdown": "m" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(list.status().as_u16(), 401);
    assert_eq!(create.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_token_is_not_a_bearer_credential() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let tokens = register_and_obtain_tokens(&client, &address, "bearer_user", "password123").await;
    let refresh = tokens["refresh"].as_str().unwrap();

    // Act: present the refresh token where an access token belongs
    let response = client
        .get(&format!("{}/notes/", address))
        .header("Authorization", format!("Bearer {}", refresh))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}
