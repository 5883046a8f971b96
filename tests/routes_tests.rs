use faang_dashboard::routes::routes;
use faang_dashboard::services::loader::Dataset;
use serde_json::Value;
use std::sync::Arc;
use warp::http::StatusCode;

const CSV: &str = "\
Date,Company,Revenue,NetIncome,OperatingExpenses,MarketCap,StockPrice,PERatio
2020-03-31,Meta,10,2,7,300,150.5,20
2020-03-31,Apple,40,8,28,900,70.25,30
2020-06-30,Meta,12,3,8,320,160,22
2021-03-31,Meta,15,4,9,400,180,24
2021-03-31,Apple,50,10,30,1100,90,28
";

fn dataset() -> Arc<Dataset> {
    Arc::new(Dataset::from_reader(CSV.as_bytes()).unwrap())
}

async fn get(path: &str) -> (StatusCode, Value) {
    let api = routes(dataset());
    let res = warp::test::request().method("GET").path(path).reply(&api).await;
    let body = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
    (res.status(), body)
}

#[tokio::test]
async fn health_reports_record_count() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 5);
}

#[tokio::test]
async fn companies_come_with_colors() {
    let (status, body) = get("/api/v1/companies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["company"], "Meta");
    assert_eq!(body[0]["color"], "#1877F2");
    assert_eq!(body[1]["company"], "Apple");
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn records_honor_company_and_range_filters() {
    let (status, body) = get("/api/v1/records?companies=Meta&start=2020Q2&end=2021Q1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["period"], "2020Q2");
    assert_eq!(rows[1]["period"], "2021Q1");
}

#[tokio::test]
async fn yoy_growth_endpoint_returns_prior_year_comparisons() {
    let (status, body) = get("/api/v1/growth/yoy?start=2021Q1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["company"], "Meta");
    assert!((rows[0]["growth"].as_f64().unwrap() - 50.0).abs() < 1e-9);
    assert!((rows[1]["growth"].as_f64().unwrap() - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn invalid_metric_is_a_bad_request() {
    let (status, body) = get("/api/v1/metric?metric=EBITDA").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("EBITDA"));
}

#[tokio::test]
async fn metric_series_carries_its_label() {
    let (status, body) = get("/api/v1/metric?metric=StockPrice&companies=Apple").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metric"], "StockPrice");
    assert_eq!(body["label"], "Stock Price ($)");
    assert_eq!(body["series"][0]["value"], 70.25);
}

#[tokio::test]
async fn unknown_company_is_a_bad_request() {
    let (status, _) = get("/api/v1/records?companies=Tesla").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_totals_and_latest_snapshot() {
    let (status, body) = get("/api/v1/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_revenue"], 127.0);
    assert_eq!(body["summary"]["record_count"], 5);
    assert_eq!(body["latest"]["total_revenue"], 65.0);
}

#[tokio::test]
async fn dashboard_over_an_empty_selection_is_flagged() {
    let (status, body) = get("/api/v1/dashboard?start=2021Q4&end=2020Q1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["empty"], true);
    assert_eq!(body["summary"]["total_revenue"], 0.0);
    assert_eq!(body["summary"]["mean_pe_ratio"], 0.0);
    assert!(body["yoy_growth"].as_array().unwrap().is_empty());
    assert!(body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_bundles_every_view() {
    let (status, body) = get("/api/v1/dashboard?metric=net_income").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["empty"], false);
    assert_eq!(body["start"], "2020Q1");
    assert_eq!(body["end"], "2021Q1");
    assert_eq!(body["metric"]["metric"], "NetIncome");
    assert_eq!(body["market_cap_share"].as_array().unwrap().len(), 2);
    assert_eq!(body["annual_growth"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let api = routes(dataset());
    let res = warp::test::request()
        .method("GET")
        .path("/api/v1/export.csv?companies=Apple")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/csv");
    let disposition = res.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"faang_financial_data_"));

    let text = std::str::from_utf8(res.body()).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("Date,Company,Year,Quarter"));
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = get("/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn empty_selection_totals_serialize_as_positive_zero() {
    for path in ["/api/v1/dashboard?companies=", "/api/v1/summary?start=2021Q4&end=2020Q1"] {
        let api = routes(dataset());
        let res = warp::test::request().method("GET").path(path).reply(&api).await;
        assert_eq!(res.status(), StatusCode::OK);
        let text = std::str::from_utf8(res.body()).unwrap();
        assert!(!text.contains("-0.0"), "negative zero in {}: {}", path, text);

        let body: Value = serde_json::from_str(text).unwrap();
        let total = body["summary"]["total_revenue"].as_f64().unwrap();
        assert!(!total.is_sign_negative());
    }
}

#[tokio::test]
async fn repeated_company_params_select_each_company() {
    let (status, repeated) = get("/api/v1/records?companies=Meta&companies=Apple&start=2021Q1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, joined) = get("/api/v1/records?companies=Meta,Apple&start=2021Q1").await;
    assert_eq!(repeated, joined);
    assert_eq!(repeated.as_array().unwrap().len(), 2);
}
