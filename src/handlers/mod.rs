// src/handlers/mod.rs

pub mod comments;
pub mod fallback;
pub mod health;
