// src/handlers/companies.rs
use log::info;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::palette::palette_for;
use crate::services::loader::Dataset;

pub async fn get_companies(dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    info!("Handling request to list companies");
    Ok(warp::reply::json(&palette_for(&dataset.companies())))
}

pub async fn get_health(dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({
        "status": "ok",
        "records": dataset.len(),
    })))
}
