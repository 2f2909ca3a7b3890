// src/utils/mod.rs

pub mod json;
pub mod params;
pub mod validator;
