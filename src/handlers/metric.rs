// src/handlers/metric.rs
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::query::FilterQuery;
use crate::models::{FinancialRecord, Metric, MetricPoint};
use crate::services::loader::Dataset;
use crate::services::transform::{filter, parse_metric, project_metric};

#[derive(Serialize)]
pub struct MetricResponse {
    pub metric: Metric,
    pub label: &'static str,
    pub series: Vec<MetricPoint>,
}

pub(crate) fn metric_response(
    filtered: &[FinancialRecord],
    metric_name: &str,
) -> Result<MetricResponse, ApiError> {
    let metric = parse_metric(metric_name).map_err(|e| {
        warn!("Rejected metric request: {}", e);
        ApiError::from(e)
    })?;

    Ok(MetricResponse {
        metric,
        label: metric.label(),
        series: project_metric(filtered, metric),
    })
}

pub async fn get_metric_series(
    query: FilterQuery,
    dataset: Arc<Dataset>,
) -> Result<Json, Rejection> {
    info!("Handling request for metric series {:?}", query.metric);
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);
    let response = metric_response(&filtered, &selection.metric).map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&response))
}
