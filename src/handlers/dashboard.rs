// src/handlers/dashboard.rs
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::metric::{metric_response, MetricResponse};
use super::palette::{palette_for, CompanyInfo};
use super::query::FilterQuery;
use crate::models::{
    AggregateSummary, AnnualGrowthRecord, FinancialRecord, GrowthRecord, LatestSnapshot,
    MarketCapShare, Period,
};
use crate::services::loader::Dataset;
use crate::services::transform::{
    compute_annual_growth, compute_yoy_growth, filter, latest_snapshot, market_cap_share,
    summarize,
};

/// Everything one render of the dashboard needs.
#[derive(Serialize)]
struct DashboardResponse {
    empty: bool,
    start: Period,
    end: Period,
    companies: Vec<CompanyInfo>,
    summary: AggregateSummary,
    latest: LatestSnapshot,
    market_cap_share: Vec<MarketCapShare>,
    yoy_growth: Vec<GrowthRecord>,
    annual_growth: Vec<AnnualGrowthRecord>,
    metric: MetricResponse,
    records: Vec<FinancialRecord>,
}

pub async fn get_dashboard(query: FilterQuery, dataset: Arc<Dataset>) -> Result<Json, Rejection> {
    info!("Handling dashboard request");
    let selection = query.to_selection(&dataset).map_err(warp::reject::custom)?;
    let filtered = filter(dataset.records(), &selection);

    if filtered.is_empty() {
        warn!("No data available for the selected filters: {:?}", selection);
    }

    let metric = metric_response(&filtered, &selection.metric).map_err(warp::reject::custom)?;
    let selected: Vec<_> = selection.companies.iter().copied().collect();

    let response = DashboardResponse {
        empty: filtered.is_empty(),
        start: selection.start,
        end: selection.end,
        companies: palette_for(&selected),
        summary: summarize(&filtered),
        latest: latest_snapshot(&filtered),
        market_cap_share: market_cap_share(&filtered),
        yoy_growth: compute_yoy_growth(&filtered, &dataset),
        annual_growth: compute_annual_growth(&filtered),
        metric,
        records: filtered,
    };
    Ok(warp::reply::json(&response))
}
