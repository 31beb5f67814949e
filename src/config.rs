// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of issued access tokens, in seconds.
    pub access_token_lifetime_secs: u64,
    /// Lifetime of issued refresh tokens, in seconds.
    pub refresh_token_lifetime_secs: u64,
    pub rust_log: String,
    /// Directory holding the built front-end bundle (index.html + assets).
    pub static_dir: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:notes.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let access_token_lifetime_secs = env::var("ACCESS_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1800); // 30 minutes

        let refresh_token_lifetime_secs = env::var("REFRESH_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 3600); // 7 days

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Self {
            database_url,
            jwt_secret,
            access_token_lifetime_secs,
            refresh_token_lifetime_secs,
            rust_log,
            static_dir,
            bind_addr,
        }
    }
}
