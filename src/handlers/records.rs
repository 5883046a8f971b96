// src/handlers/records.rs
use log::{debug, error, info};
use std::sync::Arc;
use warp::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::Response;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::query::FilterQuery;
use crate::services::export::{export_filename_now, to_csv_string};
use crate::services::loader::Dataset;
use crate::services::transform::filter;

pub async fn get_records(query: FilterQuery, dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    info!("Handling request for filtered records");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);
    debug!("Filter {:?} matched {} records", selection, filtered.len());
    Ok(warp::reply::json(&filtered))
}

pub async fn export_csv(
    query: FilterQuery,
    dataset: Arc<Dataset>,
) -> Result<Response<String>, Rejection> {
    info!("Handling CSV export request");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);

    let body = to_csv_string(&filtered).map_err(|e| {
        error!("Failed to write CSV export: {}", e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })?;

    let filename = export_filename_now();
    info!("Exporting {} records as {}", filtered.len(), filename);

    Response::builder()
        .header(CONTENT_TYPE, "text/csv")
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
        .map_err(|e| {
            error!("Failed to build CSV response: {}", e);
            warp::reject::custom(ApiError::internal(e.to_string()))
        })
}
