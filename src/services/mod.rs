// src/services/mod.rs
pub mod export;
pub mod loader;
pub mod transform;
