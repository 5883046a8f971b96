// src/handlers/growth.rs
use log::{debug, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::query::FilterQuery;
use crate::services::loader::Dataset;
use crate::services::transform::{compute_annual_growth, compute_yoy_growth, filter};

pub async fn get_yoy_growth(query: FilterQuery, dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    info!("Handling request for quarterly YoY growth");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);
    let growth = compute_yoy_growth(&filtered, &dataset);
    debug!("{} of {} records have a prior-year quarter", growth.len(), filtered.len());
    Ok(warp::reply::json(&growth))
}

pub async fn get_annual_growth(
    query: FilterQuery,
    dataset: Arc<Dataset>,
) -> Result<Json, Rejection> {
    info!("Handling request for annual revenue growth");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);
    Ok(warp::reply::json(&compute_annual_growth(&filtered)))
}
