// src/handlers/mod.rs
pub mod companies;
pub mod dashboard;
pub mod error;
pub mod growth;
pub mod metric;
pub mod palette;
pub mod query;
pub mod records;
pub mod summary;
