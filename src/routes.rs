// src/routes.rs

use axum::{
    Router, http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, notes, spa},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: SPA shell, diagnostics, registration, token issuance.
/// * Protected routes: the /notes/ family, behind the JWT auth middleware.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/test/", get(spa::test_view))
        .route("/token/", post(auth::obtain_token_pair))
        .route("/token/refresh/", post(auth::refresh_token))
        .route("/register/", post(auth::register));

    // Authentication happens in the middleware, never in the router:
    // any request reaching a notes handler already carries valid claims.
    let note_routes = Router::new()
        .route("/notes/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}/",
            get(notes::get_note)
                .put(notes::replace_note)
                .patch(notes::patch_note)
                .delete(notes::delete_note),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(spa::index))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(public_routes)
        .merge(note_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
