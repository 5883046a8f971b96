// src/models.rs
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The five companies covered by the dataset. Declaration order is the
/// canonical ordering used whenever rows are sorted "by period, then company".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Company {
    Meta,
    Apple,
    Amazon,
    Netflix,
    Alphabet,
}

impl Company {
    pub const ALL: [Company; 5] = [
        Company::Meta,
        Company::Apple,
        Company::Amazon,
        Company::Netflix,
        Company::Alphabet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Company::Meta => "Meta",
            Company::Apple => "Apple",
            Company::Amazon => "Amazon",
            Company::Netflix => "Netflix",
            Company::Alphabet => "Alphabet",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Company::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown company: {}", wanted))
    }
}

impl Serialize for Company {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Company {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A calendar quarter. Field order makes the derived `Ord` chronological.
/// Fields stay private so a quarter outside 1..=4 cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    quarter: u8,
}

impl Period {
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        if (1..=4).contains(&quarter) {
            Some(Period { year, quarter })
        } else {
            None
        }
    }

    pub fn first_quarter(year: i32) -> Self {
        Period { year, quarter: 1 }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            quarter: ((date.month() - 1) / 3 + 1) as u8,
        }
    }

    /// Quarters since year 0, Q1. Contiguous across year boundaries.
    fn index(&self) -> i64 {
        self.year as i64 * 4 + (self.quarter as i64 - 1)
    }

    pub fn shift(&self, quarters: i64) -> Self {
        let idx = self.index() + quarters;
        Period {
            year: idx.div_euclid(4) as i32,
            quarter: (idx.rem_euclid(4) + 1) as u8,
        }
    }

    /// Same quarter one year earlier.
    pub fn prior_year(&self) -> Self {
        self.shift(-4)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

fn period_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-?[Qq]([1-4])$").expect("valid period regex"))
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = period_pattern()
            .captures(trimmed)
            .ok_or_else(|| format!("Invalid period '{}', expected YYYYQn", trimmed))?;
        let year = caps[1].parse::<i32>().map_err(|e| e.to_string())?;
        let quarter = caps[2].parse::<u8>().map_err(|e| e.to_string())?;
        Ok(Period { year, quarter })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRecord {
    pub company: Company,
    pub period: Period,
    pub date: NaiveDate,
    pub revenue: f64,
    pub net_income: f64,
    pub operating_expenses: f64,
    pub market_cap: f64,
    pub stock_price: f64,
    pub pe_ratio: f64,
}

/// The numeric columns a user can chart on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    NetIncome,
    OperatingExpenses,
    MarketCap,
    StockPrice,
    PERatio,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Revenue,
        Metric::NetIncome,
        Metric::OperatingExpenses,
        Metric::MarketCap,
        Metric::StockPrice,
        Metric::PERatio,
    ];

    /// Column name as written in the data file.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::NetIncome => "NetIncome",
            Metric::OperatingExpenses => "OperatingExpenses",
            Metric::MarketCap => "MarketCap",
            Metric::StockPrice => "StockPrice",
            Metric::PERatio => "PERatio",
        }
    }

    fn snake_case(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::NetIncome => "net_income",
            Metric::OperatingExpenses => "operating_expenses",
            Metric::MarketCap => "market_cap",
            Metric::StockPrice => "stock_price",
            Metric::PERatio => "pe_ratio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue (Millions)",
            Metric::NetIncome => "Net Income (Millions)",
            Metric::OperatingExpenses => "Operating Expenses (Millions)",
            Metric::MarketCap => "Market Cap (Millions)",
            Metric::StockPrice => "Stock Price ($)",
            Metric::PERatio => "P/E Ratio",
        }
    }

    /// Looks a metric up by column name or snake_case name, ignoring case.
    pub fn from_name(name: &str) -> Option<Metric> {
        let wanted = name.trim();
        Metric::ALL.iter().copied().find(|m| {
            m.column().eq_ignore_ascii_case(wanted) || m.snake_case().eq_ignore_ascii_case(wanted)
        })
    }

    pub fn value_of(&self, record: &FinancialRecord) -> f64 {
        match self {
            Metric::Revenue => record.revenue,
            Metric::NetIncome => record.net_income,
            Metric::OperatingExpenses => record.operating_expenses,
            Metric::MarketCap => record.market_cap,
            Metric::StockPrice => record.stock_price,
            Metric::PERatio => record.pe_ratio,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

/// What the user picked in the filter controls. Rebuilt on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub companies: BTreeSet<Company>,
    pub start: Period,
    pub end: Period,
    pub metric: String,
}

impl FilterSelection {
    pub fn new(companies: impl IntoIterator<Item = Company>, start: Period, end: Period) -> Self {
        FilterSelection {
            companies: companies.into_iter().collect(),
            start,
            end,
            metric: Metric::Revenue.column().to_string(),
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    pub fn matches(&self, record: &FinancialRecord) -> bool {
        self.companies.contains(&record.company)
            && record.period >= self.start
            && record.period <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_revenue: f64,
    pub total_net_income: f64,
    pub total_market_cap: f64,
    pub mean_pe_ratio: f64,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRecord {
    pub company: Company,
    pub period: Period,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualGrowthRecord {
    pub company: Company,
    pub year: i32,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    pub company: Company,
    pub period: Period,
    pub value: f64,
}

/// Latest record per company inside the filtered window, with the
/// headline totals computed over just those rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestSnapshot {
    pub records: Vec<FinancialRecord>,
    pub total_revenue: f64,
    pub total_net_income: f64,
    pub total_market_cap: f64,
    pub mean_pe_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketCapShare {
    pub company: Company,
    pub market_cap: f64,
    pub share: f64,
}
