use log::{error, info};
use std::process;
use std::sync::Arc;
use warp::Filter;

use faang_dashboard::config::AppConfig;
use faang_dashboard::routes;
use faang_dashboard::services::loader::Dataset;

#[tokio::main]
async fn main() {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            process::exit(1);
        }
    };

    let dataset = match Dataset::from_path(&config.data_file) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            error!("Failed to load dataset: {:#}", e);
            process::exit(1);
        }
    };

    let addr = config.socket_addr();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(dataset).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
