// src/services/loader.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{Reader, StringRecord};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::{Company, FinancialRecord, Period};

/// The immutable quarterly table. Built once at startup and shared by
/// reference; nothing in the crate mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<FinancialRecord>,
    index: HashMap<(Company, Period), usize>,
}

impl Dataset {
    /// Builds a dataset from in-memory rows. Rows end up sorted by period
    /// then company; a repeated (company, period) keeps the first row seen.
    pub fn new(records: impl IntoIterator<Item = FinancialRecord>) -> Self {
        let mut unique: Vec<FinancialRecord> = Vec::new();
        let mut seen = HashSet::new();
        for record in records {
            let key = (record.company, record.period);
            if !seen.insert(key) {
                warn!("Duplicate row for {} {}, keeping the first", record.company, record.period);
                continue;
            }
            unique.push(record);
        }
        unique.sort_by_key(|r| (r.period, r.company));

        let index = unique
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.company, r.period), i))
            .collect();

        Dataset { records: unique, index }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading financial data from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open data file {}", path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        info!("Loaded {} records spanning {:?}", dataset.len(), dataset.period_span());
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = Reader::from_reader(reader);
        let headers = rdr.headers().context("Missing header row")?.clone();
        let columns = Columns::locate(&headers)?;

        let mut records = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable row {}: {}", line + 2, e);
                    continue;
                }
            };
            match columns.parse(&row) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed row {}: {}", line + 2, e),
            }
        }
        debug!("Parsed {} rows", records.len());

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn get(&self, company: Company, period: Period) -> Option<&FinancialRecord> {
        self.index.get(&(company, period)).map(|&i| &self.records[i])
    }

    /// Companies present in the data, in canonical order.
    pub fn companies(&self) -> Vec<Company> {
        Company::ALL
            .iter()
            .copied()
            .filter(|c| self.records.iter().any(|r| r.company == *c))
            .collect()
    }

    /// First and last period in the data, `None` when empty.
    pub fn period_span(&self) -> Option<(Period, Period)> {
        let first = self.records.first()?.period;
        let last = self.records.last()?.period;
        Some((first, last))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

enum PeriodColumns {
    Date(usize),
    YearQuarter(usize, usize),
}

struct Columns {
    period: PeriodColumns,
    company: usize,
    revenue: usize,
    net_income: usize,
    operating_expenses: usize,
    market_cap: usize,
    stock_price: usize,
    pe_ratio: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).with_context(|| format!("No '{}' column in data file", name))
        };

        let period = match (find("Date"), find("Year"), find("Quarter")) {
            (Some(d), _, _) => PeriodColumns::Date(d),
            (None, Some(y), Some(q)) => PeriodColumns::YearQuarter(y, q),
            _ => anyhow::bail!("Data file needs a 'Date' column or 'Year' and 'Quarter' columns"),
        };

        Ok(Columns {
            period,
            company: require("Company")?,
            revenue: require("Revenue")?,
            net_income: require("NetIncome")?,
            operating_expenses: require("OperatingExpenses")?,
            market_cap: require("MarketCap")?,
            stock_price: require("StockPrice")?,
            pe_ratio: require("PERatio")?,
        })
    }

    fn parse(&self, row: &StringRecord) -> Result<FinancialRecord, String> {
        let field = |idx: usize, name: &str| {
            row.get(idx)
                .map(str::trim)
                .ok_or_else(|| format!("missing '{}' field", name))
        };
        let number = |idx: usize, name: &str| -> Result<f64, String> {
            let raw = field(idx, name)?;
            let value = raw
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number in '{}'", raw, name))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(format!("non-finite value in '{}'", name))
            }
        };
        let parse_date = |idx: usize| -> Result<NaiveDate, String> {
            let raw = field(idx, "Date")?;
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| format!("bad date '{}': {}", raw, e))
        };

        let company: Company = field(self.company, "Company")?.parse()?;

        let (period, date) = match self.period {
            PeriodColumns::Date(idx) => {
                let date = parse_date(idx)?;
                (Period::from_date(date), date)
            }
            PeriodColumns::YearQuarter(y, q) => {
                let year = field(y, "Year")?
                    .parse::<i32>()
                    .map_err(|e| format!("bad year: {}", e))?;
                let quarter = field(q, "Quarter")?
                    .parse::<u8>()
                    .map_err(|e| format!("bad quarter: {}", e))?;
                let period = Period::new(year, quarter)
                    .ok_or_else(|| format!("quarter {} out of range", quarter))?;
                (period, quarter_end(period)?)
            }
        };

        Ok(FinancialRecord {
            company,
            period,
            date,
            revenue: number(self.revenue, "Revenue")?,
            net_income: number(self.net_income, "NetIncome")?,
            operating_expenses: number(self.operating_expenses, "OperatingExpenses")?,
            market_cap: number(self.market_cap, "MarketCap")?,
            stock_price: number(self.stock_price, "StockPrice")?,
            pe_ratio: number(self.pe_ratio, "PERatio")?,
        })
    }
}

/// Last calendar day of the quarter, used when the file carries no dates.
fn quarter_end(period: Period) -> Result<NaiveDate, String> {
    let next = period.shift(1);
    NaiveDate::from_ymd_opt(next.year(), (next.quarter() as u32 - 1) * 3 + 1, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| format!("no calendar date for {}", period))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Company,Revenue,NetIncome,OperatingExpenses,MarketCap,StockPrice,PERatio\n";

    #[test]
    fn loads_date_form_and_sorts() {
        let csv = format!(
            "{}2020-06-30,Apple,59685,11253,38668,1576000,364.8,29.8\n\
             2020-03-31,Meta,17737,4902,10788,475000,166.8,24.1\n\
             2020-06-30,Meta,18687,5178,11101,650000,227.1,31.2\n",
            HEADER
        );
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let order: Vec<_> = ds.records().iter().map(|r| (r.period.to_string(), r.company)).collect();
        assert_eq!(
            order,
            vec![
                ("2020Q1".to_string(), Company::Meta),
                ("2020Q2".to_string(), Company::Meta),
                ("2020Q2".to_string(), Company::Apple),
            ]
        );
        assert_eq!(ds.period_span().unwrap().0, Period::new(2020, 1).unwrap());
    }

    #[test]
    fn loads_year_quarter_form() {
        let csv = "Company,Year,Quarter,Revenue,NetIncome,OperatingExpenses,MarketCap,StockPrice,PERatio\n\
                   Netflix,2021,4,7709,607,6414,267000,602.4,54.2\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let r = ds.get(Company::Netflix, Period::new(2021, 4).unwrap()).unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        assert_eq!(r.revenue, 7709.0);
    }

    #[test]
    fn excludes_malformed_and_duplicate_rows() {
        let csv = format!(
            "{}2020-03-31,Meta,17737,4902,10788,475000,166.8,24.1\n\
             2020-03-31,Meta,1,1,1,1,1,1\n\
             2020-03-31,Microsoft,1,1,1,1,1,1\n\
             not-a-date,Apple,1,1,1,1,1,1\n\
             2020-03-31,Amazon,abc,1,1,1,1,1\n",
            HEADER
        );
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].revenue, 17737.0);
        assert_eq!(ds.companies(), vec![Company::Meta]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Date,Company,Revenue\n2020-03-31,Meta,1\n";
        assert!(Dataset::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Dataset::from_path("does/not/exist.csv").is_err());
    }
}
