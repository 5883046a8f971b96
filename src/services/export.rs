// src/services/export.rs
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use csv::Writer;
use std::io::Write;

use crate::models::FinancialRecord;

pub const EXPORT_HEADER: [&str; 10] = [
    "Date",
    "Company",
    "Year",
    "Quarter",
    "Revenue",
    "NetIncome",
    "OperatingExpenses",
    "MarketCap",
    "StockPrice",
    "PERatio",
];

/// Writes rows in the same column layout the loader reads.
pub fn write_csv<W: Write>(records: &[FinancialRecord], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;

    for r in records {
        wtr.write_record(&[
            r.date.format("%Y-%m-%d").to_string(),
            r.company.to_string(),
            r.period.year().to_string(),
            r.period.quarter().to_string(),
            r.revenue.to_string(),
            r.net_income.to_string(),
            r.operating_expenses.to_string(),
            r.market_cap.to_string(),
            r.stock_price.to_string(),
            r.pe_ratio.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[FinancialRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("faang_financial_data_{}.csv", today.format("%Y%m%d"))
}

pub fn export_filename_now() -> String {
    export_filename(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_compact_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(day), "faang_financial_data_20240307.csv");
    }

    #[test]
    fn empty_table_still_has_header() {
        let out = to_csv_string(&[]).unwrap();
        assert_eq!(out.trim_end(), EXPORT_HEADER.join(","));
    }
}
