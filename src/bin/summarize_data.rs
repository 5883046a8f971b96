// src/bin/summarize_data.rs
use faang_dashboard::config::AppConfig;
use faang_dashboard::models::FilterSelection;
use faang_dashboard::services::loader::Dataset;
use faang_dashboard::services::transform::{compute_yoy_growth, filter, latest_snapshot, summarize};
use faang_dashboard::BoxError;
use log::{info, warn};

fn main() -> Result<(), BoxError> {
    env_logger::init();
    let config = AppConfig::from_env()?;
    let dataset = Dataset::from_path(&config.data_file)?;

    let Some((start, end)) = dataset.period_span() else {
        warn!("Dataset at {} is empty", config.data_file.display());
        return Ok(());
    };
    info!("Periods: {} .. {}", start, end);

    let selection = FilterSelection::new(dataset.companies(), start, end);
    let filtered = filter(dataset.records(), &selection);

    let summary = summarize(&filtered);
    info!("Records:          {}", summary.record_count);
    info!("Total revenue:    ${:.0}M", summary.total_revenue);
    info!("Total net income: ${:.0}M", summary.total_net_income);
    info!("Mean P/E:         {:.1}", summary.mean_pe_ratio);

    for record in latest_snapshot(&filtered).records {
        info!(
            "  {} {}: revenue ${:.0}M, market cap ${:.0}M",
            record.company, record.period, record.revenue, record.market_cap
        );
    }

    let growth = compute_yoy_growth(&filtered, &dataset);
    if let Some(last) = growth.last() {
        info!("Latest YoY point: {} {} {:.1}%", last.company, last.period, last.growth);
    }
    Ok(())
}
