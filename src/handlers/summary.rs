// src/handlers/summary.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::query::FilterQuery;
use crate::models::{AggregateSummary, LatestSnapshot, MarketCapShare};
use crate::services::loader::Dataset;
use crate::services::transform::{filter, latest_snapshot, market_cap_share, summarize};

#[derive(Serialize)]
struct SummaryResponse {
    summary: AggregateSummary,
    latest: LatestSnapshot,
}

pub async fn get_summary(query: FilterQuery, dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    info!("Handling request for summary aggregates");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);

    let response = SummaryResponse {
        summary: summarize(&filtered),
        latest: latest_snapshot(&filtered),
    };
    Ok(warp::reply::json(&response))
}

pub async fn get_market_cap_share(
    query: FilterQuery,
    dataset: Arc<Dataset>,
) -> Result<Json, Rejection> {
    info!("Handling request for market cap distribution");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);
    let shares: Vec<MarketCapShare> = market_cap_share(&filtered);
    Ok(warp::reply::json(&shares))
}
