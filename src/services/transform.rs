// src/services/transform.rs
use log::debug;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{
    AggregateSummary, AnnualGrowthRecord, Company, FilterSelection, FinancialRecord,
    GrowthRecord, LatestSnapshot, MarketCapShare, Metric, MetricPoint,
};
use crate::services::loader::Dataset;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Invalid metric '{0}', expected one of Revenue, NetIncome, OperatingExpenses, MarketCap, StockPrice, PERatio")]
    InvalidMetric(String),
}

/// Sum starting from +0.0. `Iterator::sum` on an empty f64 iterator yields
/// -0.0, which serializes as `-0.0`.
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        total(values.iter().copied()) / values.len() as f64
    }
}

fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Rows matching the selection, sorted by period then company. An inverted
/// range or an empty company set selects nothing.
pub fn filter(records: &[FinancialRecord], selection: &FilterSelection) -> Vec<FinancialRecord> {
    if selection.start > selection.end || selection.companies.is_empty() {
        debug!("Selection is empty: {:?}", selection);
        return Vec::new();
    }

    let mut filtered: Vec<FinancialRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    filtered.sort_by_key(|r| (r.period, r.company));
    filtered
}

pub fn summarize(records: &[FinancialRecord]) -> AggregateSummary {
    let pe_ratios: Vec<f64> = records.iter().map(|r| r.pe_ratio).collect();

    AggregateSummary {
        total_revenue: total(records.iter().map(|r| r.revenue)),
        total_net_income: total(records.iter().map(|r| r.net_income)),
        total_market_cap: total(records.iter().map(|r| r.market_cap)),
        mean_pe_ratio: calculate_average(&pe_ratios),
        record_count: records.len(),
    }
}

/// Quarterly revenue growth against the same quarter a year earlier. The
/// prior quarter is looked up in the full dataset, so it may sit outside the
/// filtered window. Points with no prior quarter (or a zero prior revenue)
/// are left out.
pub fn compute_yoy_growth(filtered: &[FinancialRecord], dataset: &Dataset) -> Vec<GrowthRecord> {
    let mut growth: Vec<GrowthRecord> = filtered
        .iter()
        .filter_map(|current| {
            let prior = dataset.get(current.company, current.period.prior_year())?;
            let value = percent_change(prior.revenue, current.revenue)?;
            Some(GrowthRecord {
                company: current.company,
                period: current.period,
                growth: value,
            })
        })
        .collect();
    growth.sort_by_key(|g| (g.period, g.company));
    growth
}

pub fn parse_metric(metric_name: &str) -> Result<Metric, TransformError> {
    Metric::from_name(metric_name)
        .ok_or_else(|| TransformError::InvalidMetric(metric_name.to_string()))
}

pub fn project_metric(filtered: &[FinancialRecord], metric: Metric) -> Vec<MetricPoint> {
    let mut series: Vec<MetricPoint> = filtered
        .iter()
        .map(|r| MetricPoint {
            company: r.company,
            period: r.period,
            value: metric.value_of(r),
        })
        .collect();
    series.sort_by_key(|p| (p.period, p.company));
    series
}

/// One numeric column per record, in chronological order. Unknown metric
/// names fail rather than falling back to a default column.
pub fn select_metric_series(
    filtered: &[FinancialRecord],
    metric_name: &str,
) -> Result<Vec<MetricPoint>, TransformError> {
    let metric = parse_metric(metric_name)?;
    Ok(project_metric(filtered, metric))
}

/// The most recent row for each company, with headline totals over those rows.
pub fn latest_snapshot(filtered: &[FinancialRecord]) -> LatestSnapshot {
    let mut latest: BTreeMap<Company, &FinancialRecord> = BTreeMap::new();
    for record in filtered {
        latest
            .entry(record.company)
            .and_modify(|existing| {
                if record.period > existing.period {
                    *existing = record;
                }
            })
            .or_insert(record);
    }

    let records: Vec<FinancialRecord> = latest.into_values().cloned().collect();
    let pe_ratios: Vec<f64> = records.iter().map(|r| r.pe_ratio).collect();

    LatestSnapshot {
        total_revenue: total(records.iter().map(|r| r.revenue)),
        total_net_income: total(records.iter().map(|r| r.net_income)),
        total_market_cap: total(records.iter().map(|r| r.market_cap)),
        mean_pe_ratio: calculate_average(&pe_ratios),
        records,
    }
}

/// Growth of each company's summed yearly revenue against the prior year,
/// using only the rows in the filtered window.
pub fn compute_annual_growth(filtered: &[FinancialRecord]) -> Vec<AnnualGrowthRecord> {
    let mut yearly: BTreeMap<(Company, i32), f64> = BTreeMap::new();
    for record in filtered {
        *yearly.entry((record.company, record.period.year())).or_insert(0.0) += record.revenue;
    }

    let mut growth: Vec<AnnualGrowthRecord> = yearly
        .iter()
        .filter_map(|(&(company, year), &current)| {
            let previous = *yearly.get(&(company, year - 1))?;
            if previous <= 0.0 {
                return None;
            }
            Some(AnnualGrowthRecord {
                company,
                year,
                growth: (current - previous) / previous * 100.0,
            })
        })
        .collect();
    growth.sort_by_key(|g| (g.year, g.company));
    growth
}

pub fn market_cap_share(filtered: &[FinancialRecord]) -> Vec<MarketCapShare> {
    let snapshot = latest_snapshot(filtered);
    let total = snapshot.total_market_cap;

    snapshot
        .records
        .iter()
        .map(|r| MarketCapShare {
            company: r.company,
            market_cap: r.market_cap,
            share: if total > 0.0 { r.market_cap / total * 100.0 } else { 0.0 },
        })
        .collect()
}
