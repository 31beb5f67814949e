// src/handlers/mod.rs

pub mod auth;
pub mod notes;
pub mod spa;
