// src/routes.rs
use log::{error, info};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::companies::{get_companies, get_health};
use crate::handlers::dashboard::get_dashboard;
use crate::handlers::error::ApiError;
use crate::handlers::growth::{get_annual_growth, get_yoy_growth};
use crate::handlers::metric::get_metric_series;
use crate::handlers::query::FilterQuery;
use crate::handlers::records::{export_csv, get_records};
use crate::handlers::summary::{get_market_cap_share, get_summary};
use crate::services::loader::Dataset;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    dataset: Arc<Dataset>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let data_filter = warp::any().map(move || dataset.clone());
    let query = warp::query::<Vec<(String, String)>>().map(FilterQuery::from_pairs);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(data_filter.clone())
        .and_then(get_health);

    let companies_route = warp::path!("api" / "v1" / "companies")
        .and(warp::get())
        .and(data_filter.clone())
        .and_then(get_companies);

    let records_route = warp::path!("api" / "v1" / "records")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_records);

    let summary_route = warp::path!("api" / "v1" / "summary")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_summary);

    let yoy_route = warp::path!("api" / "v1" / "growth" / "yoy")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_yoy_growth);

    let annual_route = warp::path!("api" / "v1" / "growth" / "annual")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_annual_growth);

    let share_route = warp::path!("api" / "v1" / "market_cap_share")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_market_cap_share);

    let metric_route = warp::path!("api" / "v1" / "metric")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_metric_series);

    let dashboard_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::get())
        .and(query.clone())
        .and(data_filter.clone())
        .and_then(get_dashboard);

    let export_route = warp::path!("api" / "v1" / "export.csv")
        .and(warp::get())
        .and(query)
        .and(data_filter)
        .and_then(export_csv);

    info!("All routes configured successfully.");

    health_route
        .or(companies_route)
        .or(records_route)
        .or(summary_route)
        .or(yoy_route)
        .or(annual_route)
        .or(share_route)
        .or(metric_route)
        .or(dashboard_route)
        .or(export_route)
        .recover(handle_rejection)
}
