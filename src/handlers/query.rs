// src/handlers/query.rs
use super::error::ApiError;
use crate::models::{Company, FilterSelection, Metric, Period};
use crate::services::loader::Dataset;

/// Raw filter controls as they arrive on the query string.
///
/// `companies` may be repeated, and each value may be comma-separated, so
/// `companies=Meta,Apple` and `companies=Meta&companies=Apple` agree. Leaving
/// it out selects every company in the data; passing it empty selects none.
/// `start` and `end` default to the dataset's span.
#[derive(Debug, Default, Clone)]
pub struct FilterQuery {
    pub companies: Option<Vec<String>>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub metric: Option<String>,
}

impl FilterQuery {
    /// Builds the query from decoded `key=value` pairs. Unknown keys are
    /// ignored; a repeated `start`, `end` or `metric` keeps the last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = FilterQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "companies" => query.companies.get_or_insert_with(Vec::new).push(value),
                "start" => query.start = Some(value),
                "end" => query.end = Some(value),
                "metric" => query.metric = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn to_selection(&self, dataset: &Dataset) -> Result<FilterSelection, ApiError> {
        let companies: Vec<Company> = match &self.companies {
            None => dataset.companies(),
            Some(values) => values
                .iter()
                .flat_map(|v| v.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Company>().map_err(ApiError::bad_request))
                .collect::<Result<_, _>>()?,
        };

        let (first, last) = dataset
            .period_span()
            .unwrap_or((Period::first_quarter(0), Period::first_quarter(0)));
        let start = parse_period(self.start.as_deref())?.unwrap_or(first);
        let end = parse_period(self.end.as_deref())?.unwrap_or(last);

        let metric = self
            .metric
            .clone()
            .unwrap_or_else(|| Metric::Revenue.column().to_string());

        Ok(FilterSelection::new(companies, start, end).with_metric(metric))
    }
}

fn parse_period(raw: Option<&str>) -> Result<Option<Period>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<Period>().map(Some).map_err(ApiError::bad_request),
    }
}
